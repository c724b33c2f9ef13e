use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

/// Storage key of the single cached snapshot.
pub const CACHE_KEY: &str = "contributionData";

/// Number of rows in a week column.
pub const DAYS_PER_WEEK: usize = 7;

// ── Calendar ──

/// One cell of the calendar. Identity is `date`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Day {
    #[serde(rename = "contributionCount")]
    pub count: u32,
    #[serde(with = "calendar_date")]
    pub date: Date,
    /// 0 = Sunday .. 6 = Saturday, as delivered by the source.
    pub weekday: u8,
}

/// One week column. Days keep the order the source delivered them in.
///
/// A full week has [`DAYS_PER_WEEK`] days; the first and last columns of a
/// year may be shorter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Week {
    #[serde(rename = "contributionDays")]
    pub days: Vec<Day>,
}

impl Week {
    pub fn first_day(&self) -> Option<&Day> {
        self.days.first()
    }

    pub fn max_count(&self) -> u32 {
        self.days.iter().map(|d| d.count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthMeta {
    pub name: String,
    #[serde(with = "calendar_date")]
    pub first_day: Date,
    /// Consecutive week columns attributed to this month, starting at the
    /// column where it first appears.
    pub total_weeks: u32,
}

impl MonthMeta {
    /// First three characters of the month name ("January" → "Jan").
    pub fn short_name(&self) -> String {
        self.name.chars().take(3).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarData {
    pub total_contributions: u64,
    pub weeks: Vec<Week>,
    pub months: Vec<MonthMeta>,
}

/// Aggregate counters plus the calendar, fetched as one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSummary {
    pub total_commit_contributions: u64,
    pub total_issue_contributions: u64,
    pub total_pull_request_contributions: u64,
    pub total_pull_request_review_contributions: u64,
    #[serde(rename = "contributionCalendar")]
    pub calendar: CalendarData,
}

impl ContributionSummary {
    /// Headline counters in display order: commits, PRs, issues, total.
    pub fn headline_stats(&self) -> [(&'static str, u64); 4] {
        [
            ("commits", self.total_commit_contributions),
            ("PRs", self.total_pull_request_contributions),
            ("issues", self.total_issue_contributions),
            ("total", self.calendar.total_contributions),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub login: String,
    #[serde(alias = "avatarUrl", default)]
    pub avatar_url: String,
}

// ── Cache ──

/// The cached snapshot. Always replaced wholesale, never edited in place.
///
/// Field names on disk match the keys the widget has always written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    #[serde(rename = "user")]
    pub profile: Profile,
    #[serde(rename = "contributions")]
    pub summary: ContributionSummary,
    pub year: i32,
    #[serde(rename = "timestamp")]
    pub fetched_at_ms: i64,
}

impl CacheEntry {
    /// True if this entry is for `year` and younger than `window_ms` at `now_ms`.
    pub fn is_fresh(&self, year: i32, now_ms: i64, window_ms: i64) -> bool {
        self.year == year && now_ms - self.fetched_at_ms < window_ms
    }
}

// ── Geometry input ──

/// Size of the host surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Negative or non-finite dimensions collapse to zero.
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            width: clean(self.width),
            height: clean(self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const CALENDAR_JSON: &str = r#"{
        "totalCommitContributions": 120,
        "totalIssueContributions": 4,
        "totalPullRequestContributions": 9,
        "totalPullRequestReviewContributions": 2,
        "contributionCalendar": {
            "totalContributions": 135,
            "weeks": [
                { "contributionDays": [
                    { "contributionCount": 3, "date": "2024-01-01", "weekday": 1 },
                    { "contributionCount": 0, "date": "2024-01-02", "weekday": 2 }
                ] }
            ],
            "months": [ { "name": "Jan", "firstDay": "2024-01-01", "totalWeeks": 5 } ]
        }
    }"#;

    #[test]
    fn summary_parses_graphql_shape() {
        let summary: ContributionSummary = serde_json::from_str(CALENDAR_JSON).unwrap();
        assert_eq!(summary.total_commit_contributions, 120);
        assert_eq!(summary.calendar.total_contributions, 135);
        let day = summary.calendar.weeks[0].days[0];
        assert_eq!(day.count, 3);
        assert_eq!(day.date, date!(2024 - 01 - 01));
        assert_eq!(day.weekday, 1);
        assert_eq!(summary.calendar.months[0].total_weeks, 5);
        assert_eq!(summary.calendar.months[0].first_day, date!(2024 - 01 - 01));
    }

    #[test]
    fn headline_stats_order() {
        let summary: ContributionSummary = serde_json::from_str(CALENDAR_JSON).unwrap();
        let stats = summary.headline_stats();
        assert_eq!(stats[0], ("commits", 120));
        assert_eq!(stats[1], ("PRs", 9));
        assert_eq!(stats[2], ("issues", 4));
        assert_eq!(stats[3], ("total", 135));
    }

    #[test]
    fn cache_entry_uses_legacy_keys() {
        let entry = CacheEntry {
            profile: Profile {
                login: "octo".into(),
                avatar_url: "https://example.com/a.png".into(),
            },
            summary: ContributionSummary::default(),
            year: 2024,
            fetched_at_ms: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["user"]["login"], "octo");
        assert_eq!(json["year"], 2024);
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
        assert!(json.get("contributions").is_some());
    }

    #[test]
    fn cache_freshness_window() {
        let entry = CacheEntry {
            profile: Profile {
                login: "octo".into(),
                avatar_url: String::new(),
            },
            summary: ContributionSummary::default(),
            year: 2024,
            fetched_at_ms: 1_000,
        };
        let window = 30 * 60_000;
        assert!(entry.is_fresh(2024, 1_000 + 5 * 60_000, window));
        assert!(!entry.is_fresh(2024, 1_000 + window, window));
        assert!(!entry.is_fresh(2023, 1_000, window));
    }

    #[test]
    fn month_short_name_truncates() {
        let m = MonthMeta {
            name: "September".into(),
            first_day: date!(2024 - 09 - 01),
            total_weeks: 4,
        };
        assert_eq!(m.short_name(), "Sep");
    }

    #[test]
    fn viewport_sanitizes_bad_input() {
        let v = Viewport::new(-10.0, f64::NAN).sanitized();
        assert_eq!(v, Viewport::new(0.0, 0.0));
    }

    #[test]
    fn profile_accepts_camel_case_avatar() {
        let p: Profile =
            serde_json::from_str(r#"{"login":"octo","avatarUrl":"https://x/y.png"}"#).unwrap();
        assert_eq!(p.avatar_url, "https://x/y.png");
    }
}
