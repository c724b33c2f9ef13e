use contrib_core::{CalendarData, DisplayMode, LayoutFlags, Viewport, WidgetSettings, Week};
use serde::Serialize;
use time::Date;

use crate::classify::{classify, observed_max};
use crate::filter::filter_weeks;
use crate::geometry::{compute_layout, LayoutMetrics};
use crate::labels::{assign_month_labels, MonthLabels};

/// Column count used for geometry when the filtered set is empty.
pub const FALLBACK_WEEK_COUNT: usize = 53;

/// The subset of settings that shapes the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridOptions {
    pub mode: DisplayMode,
    pub flags: LayoutFlags,
}

impl From<&WidgetSettings> for GridOptions {
    fn from(s: &WidgetSettings) -> Self {
        Self {
            mode: s.display_mode,
            flags: s.layout_flags(),
        }
    }
}

/// Everything a renderer needs to paint one frame of the grid.
///
/// Always rebuilt from scratch; nothing in here is updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub mode: DisplayMode,
    /// Displayed weeks, after filtering.
    pub weeks: Vec<Week>,
    /// `levels[w][d]` is the intensity of `weeks[w].days[d]`.
    pub levels: Vec<Vec<u8>>,
    pub observed_max: u32,
    pub month_labels: MonthLabels,
    pub metrics: LayoutMetrics,
    /// Column count the metrics were solved for.
    pub layout_week_count: usize,
}

impl GridView {
    /// Filter, classify, label and lay out `calendar` for the given options.
    pub fn build(calendar: &CalendarData, options: GridOptions, viewport: Viewport, today: Date) -> Self {
        let weeks = filter_weeks(&calendar.weeks, options.mode, today);
        let max = observed_max(&weeks);
        let levels = weeks
            .iter()
            .map(|w| w.days.iter().map(|d| classify(d.count, max)).collect())
            .collect();
        let month_labels = if options.flags.show_labels {
            assign_month_labels(&weeks, &calendar.months, options.mode)
        } else {
            MonthLabels::new()
        };
        let layout_week_count = if weeks.is_empty() {
            FALLBACK_WEEK_COUNT
        } else {
            weeks.len()
        };
        let metrics = compute_layout(viewport, layout_week_count, options.flags);

        Self {
            mode: options.mode,
            weeks,
            levels,
            observed_max: max,
            month_labels,
            metrics,
            layout_week_count,
        }
    }

    /// Nothing to paint. Not an error.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn level_at(&self, week: usize, day: usize) -> Option<u8> {
        self.levels.get(week)?.get(day).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrib_core::{Day, MonthMeta};
    use time::macros::date;
    use time::Duration;

    /// 52 Sunday-started weeks from 2024-01-07 with a single busy day.
    fn calendar_2024(busy: Date, count: u32) -> CalendarData {
        let first = date!(2024 - 01 - 07);
        let weeks: Vec<Week> = (0..52)
            .map(|w| Week {
                days: (0..7)
                    .map(|d| {
                        let date = first + Duration::days(w * 7 + d);
                        Day {
                            count: if date == busy { count } else { 0 },
                            date,
                            weekday: d as u8,
                        }
                    })
                    .collect(),
            })
            .collect();
        let total = weeks.iter().flat_map(|w| &w.days).map(|d| u64::from(d.count)).sum();
        let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
            .iter()
            .enumerate()
            .map(|(i, name)| MonthMeta {
                name: name.to_string(),
                first_day: first,
                total_weeks: if i % 3 == 0 { 5 } else { 4 },
            })
            .collect();
        CalendarData {
            total_contributions: total,
            weeks,
            months,
        }
    }

    #[test]
    fn single_busy_day_is_top_level() {
        let busy = date!(2024 - 03 - 12);
        let cal = calendar_2024(busy, 10);
        let view = GridView::build(&cal, GridOptions::default(), Viewport::new(800.0, 200.0), busy);
        assert_eq!(view.observed_max, 10);
        assert_eq!(view.weeks.len(), 52);
        for (w, week) in view.weeks.iter().enumerate() {
            for (d, day) in week.days.iter().enumerate() {
                let expected = if day.date == busy { 4 } else { 0 };
                assert_eq!(view.level_at(w, d), Some(expected), "{}", day.date);
            }
        }
        assert_eq!(view.layout_week_count, 52);
        assert_eq!(view.metrics, compute_layout(Viewport::new(800.0, 200.0), 52, LayoutFlags::default()));
    }

    #[test]
    fn month_mode_max_is_relative_to_visible_days() {
        let mut cal = calendar_2024(date!(2024 - 06 - 05), 3);
        // A much busier day outside June must not dilute June's intensity.
        cal.weeks[1].days[2].count = 40;
        let options = GridOptions {
            mode: DisplayMode::Month,
            flags: LayoutFlags::default(),
        };
        let view = GridView::build(&cal, options, Viewport::new(400.0, 200.0), date!(2024 - 06 - 20));
        assert_eq!(view.observed_max, 3);
        assert!(view.levels.iter().flatten().any(|&l| l == 4));
        assert!(view.weeks.len() <= 6);
    }

    #[test]
    fn hidden_labels_produce_no_month_labels() {
        let cal = calendar_2024(date!(2024 - 01 - 08), 1);
        let options = GridOptions {
            mode: DisplayMode::Year,
            flags: LayoutFlags {
                show_labels: false,
                ..LayoutFlags::default()
            },
        };
        let view = GridView::build(&cal, options, Viewport::new(800.0, 200.0), date!(2024 - 01 - 08));
        assert!(view.month_labels.is_empty());
        assert_eq!(view.metrics.month_row_height, 0);
    }

    #[test]
    fn empty_filter_result_uses_fallback_week_count() {
        let cal = calendar_2024(date!(2024 - 01 - 08), 1);
        let options = GridOptions {
            mode: DisplayMode::Month,
            flags: LayoutFlags::default(),
        };
        let view = GridView::build(&cal, options, Viewport::new(800.0, 200.0), date!(2030 - 05 - 01));
        assert!(view.is_empty());
        assert_eq!(view.observed_max, 0);
        assert_eq!(view.layout_week_count, FALLBACK_WEEK_COUNT);
        assert_eq!(view.level_at(0, 0), None);
    }

    #[test]
    fn options_follow_settings() {
        let settings = WidgetSettings {
            display_mode: DisplayMode::Month,
            show_day_labels: false,
            ..WidgetSettings::default()
        };
        let opts = GridOptions::from(&settings);
        assert_eq!(opts.mode, DisplayMode::Month);
        assert!(!opts.flags.show_day_labels);
        assert!(opts.flags.show_header);
    }
}
