//! Clock abstraction so evaluations can run against a frozen "now".

use std::sync::Mutex;

use chrono::{Duration, Utc};

use crate::Time;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current time according to the clock.
    fn now(&self) -> Time;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
///
/// Only moves when [`FixedClock::advance`] or [`FixedClock::set`] is called.
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<Time>,
}

impl FixedClock {
    /// Returns a clock fixed at the given timestamp.
    pub fn new(at: Time) -> Self {
        Self { at: Mutex::new(at) }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, delta: Duration) {
        let mut at = self.at.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *at += delta;
    }

    /// Move the clock to an exact instant.
    pub fn set(&self, to: Time) {
        let mut at = self.at.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *at = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Time {
        *self.at.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Time {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Time {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_frozen() {
        let at = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        let clock = FixedClock::new(at);

        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn test_fixed_clock_advance_and_set() {
        let at = Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 0).unwrap();
        let clock = FixedClock::new(at);

        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), at + Duration::days(2));

        clock.set(at);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_shared_clock_delegates() {
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let clock: std::sync::Arc<dyn Clock> = std::sync::Arc::new(FixedClock::new(at));
        assert_eq!(clock.now(), at);
    }
}
