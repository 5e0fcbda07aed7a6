use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::core::primitives::{datetime_to_epoch_millis, epoch_millis_to_datetime};
use crate::core::scale::tick_step;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const WEEK_MS: f64 = 7.0 * DAY_MS;
const MONTH_MS: f64 = 30.0 * DAY_MS;
const YEAR_MS: f64 = 365.0 * DAY_MS;

/// Calendar-aware tick interval.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimeInterval {
    /// Fixed length in milliseconds, aligned to the epoch.
    Fixed(f64),
    Months(u32),
    Years(i32),
}

/// Candidate intervals ordered by approximate length.
const INTERVALS: &[(TimeInterval, f64)] = &[
    (TimeInterval::Fixed(SECOND_MS), SECOND_MS),
    (TimeInterval::Fixed(5.0 * SECOND_MS), 5.0 * SECOND_MS),
    (TimeInterval::Fixed(15.0 * SECOND_MS), 15.0 * SECOND_MS),
    (TimeInterval::Fixed(30.0 * SECOND_MS), 30.0 * SECOND_MS),
    (TimeInterval::Fixed(MINUTE_MS), MINUTE_MS),
    (TimeInterval::Fixed(5.0 * MINUTE_MS), 5.0 * MINUTE_MS),
    (TimeInterval::Fixed(15.0 * MINUTE_MS), 15.0 * MINUTE_MS),
    (TimeInterval::Fixed(30.0 * MINUTE_MS), 30.0 * MINUTE_MS),
    (TimeInterval::Fixed(HOUR_MS), HOUR_MS),
    (TimeInterval::Fixed(3.0 * HOUR_MS), 3.0 * HOUR_MS),
    (TimeInterval::Fixed(6.0 * HOUR_MS), 6.0 * HOUR_MS),
    (TimeInterval::Fixed(12.0 * HOUR_MS), 12.0 * HOUR_MS),
    (TimeInterval::Fixed(DAY_MS), DAY_MS),
    (TimeInterval::Fixed(2.0 * DAY_MS), 2.0 * DAY_MS),
    (TimeInterval::Fixed(WEEK_MS), WEEK_MS),
    (TimeInterval::Months(1), MONTH_MS),
    (TimeInterval::Months(3), 3.0 * MONTH_MS),
    (TimeInterval::Years(1), YEAR_MS),
];

/// A tick on a temporal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTick {
    pub millis: f64,
    pub label: String,
}

/// Picks a calendar interval yielding roughly `count` ticks over
/// `[start, end]` (epoch milliseconds) and returns the aligned ticks.
#[must_use]
pub fn time_ticks(start: f64, end: f64, count: usize) -> Vec<TimeTick> {
    let (lo, hi) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };
    if count == 0 || !lo.is_finite() || !hi.is_finite() || lo == hi {
        return Vec::new();
    }
    let (Some(lo_time), Some(hi_time)) = (epoch_millis_to_datetime(lo), epoch_millis_to_datetime(hi))
    else {
        return Vec::new();
    };

    let target = (hi - lo) / count as f64;
    let interval = select_interval(target, lo, hi, count);
    let format = label_format(interval);

    let mut ticks = Vec::new();
    let mut cursor = align_up(lo_time, interval);
    while let Some(time) = cursor {
        if time > hi_time || ticks.len() > 10_000 {
            break;
        }
        ticks.push(TimeTick {
            millis: datetime_to_epoch_millis(time),
            label: time.format(format).to_string(),
        });
        cursor = step(time, interval);
    }
    ticks
}

fn select_interval(target: f64, lo: f64, hi: f64, count: usize) -> TimeInterval {
    let index = INTERVALS.partition_point(|(_, length)| *length < target);
    if index >= INTERVALS.len() {
        let years = tick_step(lo / YEAR_MS, hi / YEAR_MS, count).max(1.0);
        return TimeInterval::Years(years as i32);
    }
    if index == 0 {
        return INTERVALS[0].0;
    }
    // Take whichever neighbour is closer in ratio terms.
    let (below, below_len) = INTERVALS[index - 1];
    let (above, above_len) = INTERVALS[index];
    if target / below_len < above_len / target {
        below
    } else {
        above
    }
}

fn label_format(interval: TimeInterval) -> &'static str {
    match interval {
        TimeInterval::Fixed(ms) if ms < MINUTE_MS => "%H:%M:%S",
        TimeInterval::Fixed(ms) if ms < DAY_MS => "%H:%M",
        TimeInterval::Fixed(_) => "%b %d",
        TimeInterval::Months(_) => "%B",
        TimeInterval::Years(_) => "%Y",
    }
}

fn align_up(time: DateTime<Utc>, interval: TimeInterval) -> Option<DateTime<Utc>> {
    match interval {
        TimeInterval::Fixed(ms) => {
            let millis = datetime_to_epoch_millis(time);
            epoch_millis_to_datetime((millis / ms).ceil() * ms)
        }
        TimeInterval::Months(months) => {
            let floor_month = time.month0() - time.month0() % months;
            let floored = Utc
                .with_ymd_and_hms(time.year(), floor_month + 1, 1, 0, 0, 0)
                .single()?;
            if floored == time {
                Some(floored)
            } else {
                step(floored, interval)
            }
        }
        TimeInterval::Years(years) => {
            let floor_year = time.year() - time.year().rem_euclid(years);
            let floored = Utc.with_ymd_and_hms(floor_year, 1, 1, 0, 0, 0).single()?;
            if floored == time {
                Some(floored)
            } else {
                step(floored, interval)
            }
        }
    }
}

fn step(time: DateTime<Utc>, interval: TimeInterval) -> Option<DateTime<Utc>> {
    match interval {
        TimeInterval::Fixed(ms) => time.checked_add_signed(Duration::milliseconds(ms as i64)),
        TimeInterval::Months(months) => {
            let total = time.year() * 12 + time.month0() as i32 + months as i32;
            let year = total.div_euclid(12);
            let month0 = total.rem_euclid(12) as u32;
            Utc.with_ymd_and_hms(year, month0 + 1, 1, 0, 0, 0).single()
        }
        TimeInterval::Years(years) => Utc
            .with_ymd_and_hms(time.year() + years, 1, 1, 0, 0, 0)
            .single(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::time_ticks;
    use crate::core::primitives::datetime_to_epoch_millis;

    fn millis(year: i32, month: u32, day: u32) -> f64 {
        datetime_to_epoch_millis(
            Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .expect("valid date"),
        )
    }

    #[test]
    fn multi_year_span_uses_year_ticks() {
        let ticks = time_ticks(millis(1999, 1, 1), millis(2003, 1, 1), 5);
        let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, vec!["1999", "2000", "2001", "2002", "2003"]);
    }

    #[test]
    fn one_year_span_uses_month_ticks() {
        let ticks = time_ticks(millis(2001, 1, 1), millis(2001, 12, 31), 12);
        assert_eq!(ticks.len(), 12);
        assert_eq!(ticks[0].label, "January");
        assert_eq!(ticks[11].label, "December");
    }

    #[test]
    fn ticks_stay_inside_the_domain() {
        let start = millis(2001, 1, 1) + 3_600_000.0;
        let end = millis(2001, 1, 2);
        let ticks = time_ticks(start, end, 6);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|tick| tick.millis >= start && tick.millis <= end));
    }

    #[test]
    fn empty_span_has_no_ticks() {
        let at = millis(2001, 1, 1);
        assert!(time_ticks(at, at, 5).is_empty());
    }
}
