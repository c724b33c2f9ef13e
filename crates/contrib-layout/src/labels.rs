use std::collections::BTreeMap;

use contrib_core::{DisplayMode, MonthMeta, Week};

/// Week-column index → month abbreviation. Absent columns are unlabeled.
pub type MonthLabels = BTreeMap<usize, String>;

/// Decide which week columns carry a month abbreviation.
///
/// Walks the columns while counting weeks consumed in the current month;
/// only the first column of each month is labeled. The month pointer
/// advances once `total_weeks` columns have been consumed. If the metadata
/// runs out before the columns do, the remaining columns stay unlabeled.
pub fn assign_month_labels(weeks: &[Week], months: &[MonthMeta], mode: DisplayMode) -> MonthLabels {
    let mut labels = MonthLabels::new();
    let mut month_idx = starting_month(weeks, months, mode);
    let mut consumed = 0u32;

    for week_idx in 0..weeks.len() {
        let Some(month) = months.get(month_idx) else {
            break;
        };
        if consumed == 0 {
            labels.insert(week_idx, month.short_name());
        }
        consumed += 1;
        if consumed >= month.total_weeks {
            month_idx += 1;
            consumed = 0;
        }
    }
    labels
}

/// Month-mode columns start mid-year, so find the metadata entry whose name
/// matches the first shown day's month. Falls back to the first entry.
fn starting_month(weeks: &[Week], months: &[MonthMeta], mode: DisplayMode) -> usize {
    if mode != DisplayMode::Month {
        return 0;
    }
    let Some(first) = weeks.first().and_then(Week::first_day) else {
        return 0;
    };
    let short: String = first
        .date
        .month()
        .to_string()
        .chars()
        .take(3)
        .collect::<String>()
        .to_lowercase();
    months
        .iter()
        .position(|m| m.name.to_lowercase().starts_with(&short))
        .unwrap_or(0)
}

const DAY_LABELS_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const DAY_LABELS_FR: [&str; 7] = ["Dim", "Lun", "Mar", "Mer", "Jeu", "Ven", "Sam"];

/// Row labels for the day gutter with their visibility. Odd rows are hidden
/// so the gutter shows every other day.
pub fn day_labels(language: &str) -> [(&'static str, bool); 7] {
    let names = if language.eq_ignore_ascii_case("fr") {
        DAY_LABELS_FR
    } else {
        DAY_LABELS_EN
    };
    let mut out = [("", false); 7];
    for (i, name) in names.into_iter().enumerate() {
        out[i] = (name, i % 2 == 0);
    }
    out
}
