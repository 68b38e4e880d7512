//! Explicit time budgets
//!
//! A `Deadline` is created once per phase and passed down by value, so nested
//! phases carve their sub-budgets out of what actually remains instead of
//! sampling the clock independently.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    expires: Instant,
}

impl Deadline {
    /// Deadline `budget` from now
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            expires: started + budget,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.expires.saturating_duration_since(Instant::now())
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// `remaining / divisor`, capped at `cap`
    #[must_use]
    pub fn share(&self, divisor: u32, cap: Duration) -> Duration {
        (self.remaining() / divisor.max(1)).min(cap)
    }
}

/// Settle delay bounded by a share of a phase timeout: `min(cap, timeout / divisor)`
#[must_use]
pub fn bounded_settle(timeout: Duration, divisor: u32, cap: Duration) -> Duration {
    (timeout / divisor.max(1)).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_expired() {
        let d = Deadline::after(Duration::ZERO);
        assert!(d.is_expired());
        assert_eq!(d.remaining(), Duration::ZERO);
    }

    #[test]
    fn share_is_capped() {
        let d = Deadline::after(Duration::from_secs(60));
        assert!(d.share(3, Duration::from_secs(15)) <= Duration::from_secs(15));
        assert!(d.share(0, Duration::from_secs(1)) <= Duration::from_secs(1));
    }

    #[test]
    fn bounded_settle_takes_smaller_bound() {
        assert_eq!(
            bounded_settle(Duration::from_secs(30), 3, Duration::from_secs(5)),
            Duration::from_secs(5)
        );
        assert_eq!(
            bounded_settle(Duration::from_secs(6), 3, Duration::from_secs(5)),
            Duration::from_secs(2)
        );
    }
}
