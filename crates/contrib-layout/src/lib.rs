pub mod classify;
pub mod filter;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod labels;

pub use classify::{classify, observed_max, MAX_LEVEL};
pub use filter::{filter_weeks, filter_weeks_now};
pub use format::{format_count, format_day, stats_row, Tooltip};
pub use geometry::{compute_layout, LayoutMetrics};
pub use grid::{GridOptions, GridView, FALLBACK_WEEK_COUNT};
pub use labels::{assign_month_labels, day_labels, MonthLabels};
