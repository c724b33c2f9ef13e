use contrib_core::Week;

/// Highest intensity bucket.
pub const MAX_LEVEL: u8 = 4;

/// Map a day's count to an intensity bucket in `0..=4`, relative to the
/// busiest day currently displayed.
///
/// Bucket edges are inclusive upper bounds on `count / observed_max`:
/// `<= 0.25` → 1, `<= 0.50` → 2, `<= 0.75` → 3, otherwise 4.
pub fn classify(count: u32, observed_max: u32) -> u8 {
    if count == 0 || observed_max == 0 {
        return 0;
    }
    let ratio = f64::from(count) / f64::from(observed_max);
    if ratio <= 0.25 {
        1
    } else if ratio <= 0.5 {
        2
    } else if ratio <= 0.75 {
        3
    } else {
        MAX_LEVEL
    }
}

/// Largest count across the given weeks. Call it on the displayed
/// (filtered) set, not the whole year.
pub fn observed_max(weeks: &[Week]) -> u32 {
    weeks.iter().map(Week::max_count).max().unwrap_or(0)
}
