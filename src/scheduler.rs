//! How long to sleep before the next clock update.
//!
//! Once-a-second clocks wake up twice per second, just before and just after
//! the second boundary, so a late wakeup never skips a second. Coarser
//! intervals sleep until 50 ms before the next wall-clock boundary for the
//! interval: the top of the hour, the next multiple of N minutes within the
//! hour, or the next epoch multiple of the interval in seconds.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta, Timelike};

/// Lead before (or lag after) a coarse boundary.
pub const COARSE_LEAD: Duration = Duration::from_millis(50);

const EARLY_WAKE_US: u32 = 950_000;
const LATE_WAKE_US: u32 = 1_050_000;

/// Time to wait from `now` for a clock refreshed every `refresh_sec` seconds.
///
/// With no readable clock the wait is simply `refresh_sec`.
pub fn compute_wait(now: Option<&DateTime<FixedOffset>>, refresh_sec: u32) -> Duration {
    let refresh = refresh_sec.max(1);
    let Some(now) = now else {
        return Duration::from_secs(u64::from(refresh));
    };

    if refresh == 1 {
        return second_tick(now);
    }

    let remaining = match refresh {
        r if r >= 3600 => until_next_hour(now),
        r if r >= 60 => until_next_minutes(now, (r + 30) / 60),
        r => until_next_multiple(now, r),
    };
    let remaining = remaining.to_std().unwrap_or(Duration::ZERO);

    if remaining > COARSE_LEAD {
        remaining - COARSE_LEAD
    } else {
        remaining + COARSE_LEAD
    }
}

fn second_tick(now: &DateTime<FixedOffset>) -> Duration {
    // Leap seconds report 1_000_000 and above
    let sub = now.timestamp_subsec_micros().min(999_999);
    let wait = if sub < EARLY_WAKE_US {
        EARLY_WAKE_US - sub
    } else {
        LATE_WAKE_US - sub
    };
    Duration::from_micros(u64::from(wait))
}

fn into_hour(now: &DateTime<FixedOffset>) -> TimeDelta {
    TimeDelta::minutes(i64::from(now.minute()))
        + TimeDelta::seconds(i64::from(now.second()))
        + TimeDelta::microseconds(i64::from(now.timestamp_subsec_micros().min(999_999)))
}

fn until_next_hour(now: &DateTime<FixedOffset>) -> TimeDelta {
    TimeDelta::hours(1) - into_hour(now)
}

fn until_next_minutes(now: &DateTime<FixedOffset>, step: u32) -> TimeDelta {
    let step = step.max(1);
    let next_minute = (now.minute() / step + 1) * step;
    TimeDelta::minutes(i64::from(next_minute)) - into_hour(now)
}

fn until_next_multiple(now: &DateTime<FixedOffset>, refresh: u32) -> TimeDelta {
    let secs = now.timestamp();
    let refresh = i64::from(refresh);
    let next = (secs.div_euclid(refresh) + 1) * refresh;
    TimeDelta::seconds(next - secs)
        - TimeDelta::microseconds(i64::from(now.timestamp_subsec_micros().min(999_999)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, h, m, s)
            .unwrap()
            + TimeDelta::milliseconds(i64::from(ms))
    }

    #[test]
    fn test_second_tick_before_boundary() {
        assert_eq!(
            compute_wait(Some(&at(12, 0, 0, 200)), 1),
            Duration::from_millis(750)
        );
        assert_eq!(
            compute_wait(Some(&at(12, 0, 0, 0)), 1),
            Duration::from_millis(950)
        );
    }

    #[test]
    fn test_second_tick_past_early_mark() {
        assert_eq!(
            compute_wait(Some(&at(12, 0, 0, 980)), 1),
            Duration::from_millis(70)
        );
        assert_eq!(
            compute_wait(Some(&at(12, 0, 0, 950)), 1),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_minute_interval() {
        assert_eq!(
            compute_wait(Some(&at(12, 34, 56, 200)), 60),
            Duration::from_millis(3_750)
        );
        // 59 rounds to one minute
        assert_eq!(
            compute_wait(Some(&at(12, 34, 56, 200)), 59),
            Duration::from_millis(3_750)
        );
    }

    #[test]
    fn test_multi_minute_interval_aligns_within_hour() {
        // 300s -> next multiple of 5 minutes
        assert_eq!(
            compute_wait(Some(&at(12, 35, 0, 20)), 300),
            Duration::from_millis(5 * 60_000 - 20 - 50)
        );
        assert_eq!(
            compute_wait(Some(&at(12, 58, 0, 0)), 600),
            Duration::from_millis(2 * 60_000 - 50)
        );
    }

    #[test]
    fn test_hour_interval() {
        assert_eq!(
            compute_wait(Some(&at(12, 34, 56, 200)), 3600),
            Duration::from_millis((25 * 60 + 3) * 1000 + 800 - 50)
        );
    }

    #[test]
    fn test_seconds_interval_uses_epoch_multiples() {
        let now = at(12, 0, 3, 500);
        let secs = now.timestamp();
        let expected_s = (secs / 10 + 1) * 10 - secs;
        assert_eq!(
            compute_wait(Some(&now), 10),
            Duration::from_millis(expected_s as u64 * 1000 - 500 - 50)
        );
    }

    #[test]
    fn test_close_to_boundary_waits_past_it() {
        assert_eq!(
            compute_wait(Some(&at(12, 34, 59, 980)), 60),
            Duration::from_millis(70)
        );
    }

    #[test]
    fn test_no_clock_waits_full_interval() {
        assert_eq!(compute_wait(None, 1), Duration::from_secs(1));
        assert_eq!(compute_wait(None, 300), Duration::from_secs(300));
    }
}
