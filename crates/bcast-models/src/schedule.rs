//! Publish schedule computation.
//!
//! Pure function of `(now, count, cadence)`: no jitter, no skipped days,
//! no timezone handling. All times are UTC.

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::cadence::Cadence;

/// Hour of day (UTC) at which every release goes live.
pub const PUBLISH_HOUR_UTC: u32 = 21;

/// Compute the publish timestamps for `count` items.
///
/// The anchor is the day after `now` at 21:00:00.000 UTC; item `i` is
/// scheduled at `anchor + i * cadence.days()` days.
pub fn publish_schedule(now: DateTime<Utc>, count: usize, cadence: Cadence) -> Vec<DateTime<Utc>> {
    let anchor = anchor_after(now);
    (0..count)
        .map(|i| anchor + Duration::days(cadence.days() * i as i64))
        .collect()
}

/// First publish slot strictly after `now`: next calendar day, fixed hour,
/// seconds and sub-seconds zeroed.
pub fn anchor_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let at_hour = now
        .with_hour(PUBLISH_HOUR_UTC)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        // 21:00 exists on every UTC day
        .unwrap_or(now);
    at_hour + Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 14, 33, 52).unwrap()
    }

    #[test]
    fn test_anchor_is_next_day_at_21_utc() {
        let anchor = anchor_after(fixed_now());
        assert_eq!(anchor, Utc.with_ymd_and_hms(2025, 3, 11, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_anchor_zeroes_subseconds() {
        let now = fixed_now() + Duration::nanoseconds(123_456_789);
        let anchor = anchor_after(now);
        assert_eq!(anchor.timestamp_subsec_nanos(), 0);
        assert_eq!(anchor.second(), 0);
    }

    #[test]
    fn test_schedule_spacing() {
        let schedule = publish_schedule(fixed_now(), 3, Cadence::EveryOtherDay);
        assert_eq!(schedule.len(), 3);
        for pair in schedule.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(2));
        }
        for ts in &schedule {
            assert_eq!(ts.hour(), PUBLISH_HOUR_UTC);
            assert_eq!(ts.minute(), 0);
        }
    }

    #[test]
    fn test_daily_schedule_from_example() {
        let schedule = publish_schedule(fixed_now(), 2, Cadence::Daily);
        assert_eq!(schedule[0], Utc.with_ymd_and_hms(2025, 3, 11, 21, 0, 0).unwrap());
        assert_eq!(schedule[1], Utc.with_ymd_and_hms(2025, 3, 12, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_empty_schedule() {
        assert!(publish_schedule(fixed_now(), 0, Cadence::Weekly).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let a = publish_schedule(fixed_now(), 5, Cadence::Weekly);
        let b = publish_schedule(fixed_now(), 5, Cadence::Weekly);
        assert_eq!(a, b);
    }
}
