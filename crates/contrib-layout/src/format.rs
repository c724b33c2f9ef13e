use contrib_core::{ContributionSummary, Day};
use serde::Serialize;
use time::Date;

/// Compact counter text: below 1000 as-is, otherwise one decimal and `k`.
///
/// Rounds half up, so 1250 is `1.3k` and 999_950 is `1000.0k`.
pub fn format_count(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let tenths = (n * 10 + 500) / 1000;
    format!("{}.{}k", tenths / 10, tenths % 10)
}

/// `(label, formatted value)` for the stats row, in display order.
pub fn stats_row(summary: &ContributionSummary) -> Vec<(&'static str, String)> {
    summary
        .headline_stats()
        .into_iter()
        .map(|(label, value)| (label, format_count(value)))
        .collect()
}

/// "Mar 5, 2024".
pub fn format_day(date: Date) -> String {
    let month = date.month().to_string();
    format!("{} {}, {}", &month[..3], date.day(), date.year())
}

/// Offset of the tooltip's anchor from the pointer.
pub const TOOLTIP_OFFSET: (f64, f64) = (10.0, -30.0);

/// Hover text for one cell, anchored near the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub x: f64,
    pub y: f64,
    pub headline: String,
    pub detail: String,
}

impl Tooltip {
    pub fn at(day: &Day, pointer_x: f64, pointer_y: f64) -> Self {
        let noun = if day.count == 1 { "contribution" } else { "contributions" };
        Self {
            x: pointer_x + TOOLTIP_OFFSET.0,
            y: pointer_y + TOOLTIP_OFFSET.1,
            headline: format!("{} {}", day.count, noun),
            detail: format!("on {}", format_day(day.date)),
        }
    }
}
