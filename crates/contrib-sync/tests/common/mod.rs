#![allow(dead_code)]

use std::sync::Arc;

use contrib_core::{
    CacheEntry, CalendarData, ContributionSummary, Day, MonthMeta, Profile, Viewport, Week,
    WidgetSettings,
};
use contrib_github::{ApiResponse, MockAuthorizer};
use contrib_store::MemoryStore;
use contrib_sync::{Collaborators, CollectObserver, ManualClock, SyncController};
use serde_json::json;
use time::macros::date;
use time::{Date, Duration};

pub const BUSY_DAY: Date = date!(2024 - 03 - 12);

pub struct Harness {
    pub ctl: SyncController,
    pub auth: Arc<MockAuthorizer>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub observer: Arc<CollectObserver>,
}

impl Harness {
    pub fn new(auth: MockAuthorizer, store: MemoryStore) -> Self {
        Self::with_settings(auth, store, WidgetSettings::default())
    }

    pub fn with_settings(auth: MockAuthorizer, store: MemoryStore, settings: WidgetSettings) -> Self {
        let auth = Arc::new(auth);
        let store = Arc::new(store);
        let clock = Arc::new(ManualClock::on(BUSY_DAY));
        let observer = Arc::new(CollectObserver::new());
        let deps = Collaborators {
            auth: auth.clone(),
            store: store.clone(),
            clock: clock.clone(),
            observer: observer.clone(),
        };
        let ctl = SyncController::new(deps, settings, Viewport::new(800.0, 200.0));
        Self {
            ctl,
            auth,
            store,
            clock,
            observer,
        }
    }
}

/// 52 Sunday-started weeks of `year`, all zero except `busy` which has `count`.
pub fn summary(year: i32, busy: Option<(Date, u32)>) -> ContributionSummary {
    let jan1 = Date::from_calendar_date(year, time::Month::January, 1).unwrap();
    let first = jan1 - Duration::days(i64::from(jan1.weekday().number_days_from_sunday()));
    let weeks: Vec<Week> = (0..52)
        .map(|w| Week {
            days: (0..7)
                .map(|d| {
                    let date = first + Duration::days(w * 7 + d);
                    let count = match busy {
                        Some((b, c)) if b == date => c,
                        _ => 0,
                    };
                    Day {
                        count,
                        date,
                        weekday: d as u8,
                    }
                })
                .collect(),
        })
        .collect();
    let months = (1..=12u8)
        .map(|m| {
            let month = time::Month::try_from(m).unwrap();
            let first_day = Date::from_calendar_date(year, month, 1).unwrap();
            MonthMeta {
                name: month.to_string()[..3].to_string(),
                first_day,
                total_weeks: if m % 3 == 1 { 5 } else { 4 },
            }
        })
        .collect();
    let total = busy.map(|(_, c)| u64::from(c)).unwrap_or(0);
    ContributionSummary {
        total_commit_contributions: total,
        total_issue_contributions: 0,
        total_pull_request_contributions: 0,
        total_pull_request_review_contributions: 0,
        calendar: CalendarData {
            total_contributions: total,
            weeks,
            months,
        },
    }
}

pub fn profile_response(login: &str) -> ApiResponse {
    ApiResponse::ok(json!({ "login": login, "avatar_url": format!("https://avatars.example/{login}") }))
}

pub fn calendar_response(summary: &ContributionSummary) -> ApiResponse {
    ApiResponse::ok(json!({
        "data": { "user": { "contributionsCollection": serde_json::to_value(summary).unwrap() } }
    }))
}

/// Authorizer scripted for one successful load of `year`.
pub fn scripted_load(auth: &MockAuthorizer, year: i32) {
    auth.push_response("/user", profile_response("octo"));
    auth.push_response("/graphql", calendar_response(&summary(year, Some((BUSY_DAY, 10)))));
}

pub fn cached(year: i32, fetched_at_ms: i64) -> CacheEntry {
    CacheEntry {
        profile: Profile {
            login: "octo".into(),
            avatar_url: String::new(),
        },
        summary: summary(year, Some((BUSY_DAY, 10))),
        year,
        fetched_at_ms,
    }
}
