use std::time::Duration;

use tokio::time::Instant;

/// The single refresh timer handle.
///
/// Arming always replaces the previous deadline, so there is never more than
/// one pending refresh.
#[derive(Debug)]
pub struct RefreshTimer {
    period: Duration,
    deadline: Option<Instant>,
    arms: u64,
}

impl RefreshTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
            arms: 0,
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(Duration::from_secs(u64::from(minutes) * 60))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Takes effect on the next `arm`.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Clear, then set a deadline one period after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
        self.arms += 1;
    }

    /// Returns whether a deadline was pending.
    pub fn disarm(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Total number of `arm` calls.
    pub fn arm_count(&self) -> u64 {
        self.arms
    }
}
