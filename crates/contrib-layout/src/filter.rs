use contrib_core::{DisplayMode, Week};
use time::{Date, OffsetDateTime};

/// Narrow the year's weeks to the ones shown in `mode`.
///
/// `Year` returns every week. `Month` keeps a week if any of its days falls
/// in the same calendar month and year as `today`; the result may be empty.
pub fn filter_weeks(weeks: &[Week], mode: DisplayMode, today: Date) -> Vec<Week> {
    match mode {
        DisplayMode::Year => weeks.to_vec(),
        DisplayMode::Month => weeks
            .iter()
            .filter(|week| {
                week.days
                    .iter()
                    .any(|d| d.date.year() == today.year() && d.date.month() == today.month())
            })
            .cloned()
            .collect(),
    }
}

/// [`filter_weeks`] against the wall clock at call time.
pub fn filter_weeks_now(weeks: &[Week], mode: DisplayMode) -> Vec<Week> {
    filter_weeks(weeks, mode, OffsetDateTime::now_utc().date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrib_core::Day;
    use time::{Duration, Weekday};

    /// Sunday-started weeks covering `first..first + n*7`.
    fn weeks_from(first: Date, n: usize) -> Vec<Week> {
        (0..n)
            .map(|w| Week {
                days: (0..7)
                    .map(|d| {
                        let date = first + Duration::days((w * 7 + d) as i64);
                        Day {
                            count: 0,
                            date,
                            weekday: date.weekday().number_days_from_sunday(),
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    fn jan_2023_sunday() -> Date {
        Date::from_calendar_date(2023, time::Month::January, 1).unwrap()
    }

    #[test]
    fn year_mode_is_identity() {
        let weeks = weeks_from(jan_2023_sunday(), 53);
        let today = Date::from_calendar_date(2023, time::Month::June, 15).unwrap();
        assert_eq!(filter_weeks(&weeks, DisplayMode::Year, today), weeks);
    }

    #[test]
    fn month_mode_keeps_boundary_weeks() {
        assert_eq!(jan_2023_sunday().weekday(), Weekday::Sunday);
        let weeks = weeks_from(jan_2023_sunday(), 53);
        // March 2023 starts on a Wednesday and ends on a Friday: 5 touching weeks.
        let today = Date::from_calendar_date(2023, time::Month::March, 20).unwrap();
        let kept = filter_weeks(&weeks, DisplayMode::Month, today);
        assert_eq!(kept.len(), 5);
        assert!(kept
            .iter()
            .all(|w| w.days.iter().any(|d| d.date.month() == time::Month::March)));
        // First kept week spans February into March.
        assert_eq!(kept[0].days[0].date.month(), time::Month::February);
    }

    #[test]
    fn month_mode_is_idempotent() {
        let weeks = weeks_from(jan_2023_sunday(), 53);
        let today = Date::from_calendar_date(2023, time::Month::October, 3).unwrap();
        let once = filter_weeks(&weeks, DisplayMode::Month, today);
        let twice = filter_weeks(&once, DisplayMode::Month, today);
        assert_eq!(once, twice);
    }

    #[test]
    fn month_mode_other_year_is_empty() {
        let weeks = weeks_from(jan_2023_sunday(), 53);
        let today = Date::from_calendar_date(2025, time::Month::March, 1).unwrap();
        assert!(filter_weeks(&weeks, DisplayMode::Month, today).is_empty());
    }
}
