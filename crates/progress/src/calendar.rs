//! Whole-day arithmetic on instants.

use coursepace_core::Time;

/// Length of one counted day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Number of full 24-hour periods between two instants.
///
/// Symmetric in its arguments. Partial days are truncated, and since both
/// sides are absolute instants the UTC offset they were written with (and any
/// DST change between them) has no effect.
pub fn days_between(a: Time, b: Time) -> u64 {
    (a - b).num_seconds().unsigned_abs() / SECONDS_PER_DAY as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    fn base() -> Time {
        Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
    }

    #[test]
    fn test_same_instant_is_zero() {
        assert_eq!(days_between(base(), base()), 0);
    }

    #[test]
    fn test_partial_days_truncate() {
        let later = base() + Duration::days(3) + Duration::hours(23) + Duration::seconds(59);
        assert_eq!(days_between(later, base()), 3);
        assert_eq!(days_between(base(), base() + Duration::seconds(86_399)), 0);
        assert_eq!(days_between(base(), base() + Duration::seconds(86_400)), 1);
    }

    #[test]
    fn test_symmetric() {
        let later = base() + Duration::days(10) + Duration::seconds(5);
        assert_eq!(days_between(later, base()), 10);
        assert_eq!(days_between(base(), later), 10);
    }

    #[test]
    fn test_ignores_time_of_day_across_midnight() {
        // 23:00 to 01:00 two calendar dates later is still one full day.
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 1, 0, 0).unwrap();
        assert_eq!(days_between(start, end), 1);
    }

    #[test]
    fn test_offsets_do_not_change_count() {
        let east = FixedOffset::east_opt(9 * 3600).unwrap();
        let west = FixedOffset::west_opt(5 * 3600).unwrap();

        // Same instants written in different offsets.
        let start = east.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap().with_timezone(&Utc);
        let end = west.with_ymd_and_hms(2024, 3, 11, 19, 0, 0).unwrap().with_timezone(&Utc);
        assert_eq!(end - start, Duration::hours(48));
        assert_eq!(days_between(start, end), 2);
    }

    #[test]
    fn test_dst_shift_in_offsets() {
        // Europe/Berlin style switch: +01:00 before, +02:00 after. Local
        // wall-clock 00:00 to 00:00 spans only 23 real hours.
        let winter = FixedOffset::east_opt(3600).unwrap();
        let summer = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = winter.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap().with_timezone(&Utc);
        let end = summer.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap().with_timezone(&Utc);
        assert_eq!(days_between(start, end), 0);
    }
}
