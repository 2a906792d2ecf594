//! Elapsed work time readouts.
//!
//! The live readout shows decimal hours and an h/m/s breakdown side by side.
//! Both are derived from one millisecond count so the two numbers never
//! disagree.

use std::fmt;

use chrono::{DateTime, Utc};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_HOUR: u64 = 3_600_000;

/// Shown before the employee has clocked in.
pub const IDLE_READOUT: &str = "0.0 hours";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ElapsedTime {
    millis: u64,
}

impl ElapsedTime {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Time between `since` and `now`. A `since` in the future (clock skew
    /// between server and host) reads as zero.
    pub fn between(since: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let millis = (now - since).num_milliseconds();
        Self::from_millis(u64::try_from(millis).unwrap_or(0))
    }

    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn hours(&self) -> f64 {
        self.millis as f64 / MS_PER_HOUR as f64
    }

    /// Whole hours, minutes and seconds.
    pub const fn breakdown(&self) -> (u64, u64, u64) {
        let total_secs = self.millis / MS_PER_SECOND;
        (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
    }

    pub fn decimal_label(&self) -> String {
        format_hours(self.hours())
    }

    pub fn breakdown_label(&self) -> String {
        let (h, m, s) = self.breakdown();
        format!("{h}h {m}m {s}s")
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.decimal_label(), self.breakdown_label())
    }
}

/// Two-decimal hours label, used for live and final readouts alike.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2} hours")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn hms(h: u64, m: u64, s: u64) -> ElapsedTime {
        ElapsedTime::from_millis(((h * 60 + m) * 60 + s) * 1000)
    }

    #[test]
    fn formats_decimal_and_breakdown_from_same_source() {
        let elapsed = hms(2, 21, 5);

        assert_eq!(elapsed.decimal_label(), "2.35 hours");
        assert_eq!(elapsed.breakdown_label(), "2h 21m 5s");
        assert_eq!(elapsed.to_string(), "2.35 hours (2h 21m 5s)");
    }

    #[test]
    fn breakdown_truncates_partial_seconds() {
        let elapsed = ElapsedTime::from_millis(59_999);
        assert_eq!(elapsed.breakdown(), (0, 0, 59));
        assert_eq!(elapsed.decimal_label(), "0.02 hours");
    }

    #[test]
    fn zero_elapsed() {
        assert_eq!(ElapsedTime::default().to_string(), "0.00 hours (0h 0m 0s)");
    }

    #[test]
    fn long_shifts_do_not_wrap_hours() {
        assert_eq!(hms(26, 0, 1).breakdown_label(), "26h 0m 1s");
    }

    #[test]
    fn between_clamps_future_clock_in() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();

        assert_eq!(
            ElapsedTime::between(now + Duration::seconds(30), now),
            ElapsedTime::default()
        );
        assert_eq!(
            ElapsedTime::between(now - Duration::minutes(1), now).as_millis(),
            60_000
        );
    }

    #[test]
    fn final_hours_use_two_decimals() {
        assert_eq!(format_hours(1.0), "1.00 hours");
        assert_eq!(format_hours(7.456), "7.46 hours");
        assert_eq!(format_hours(0.0), "0.00 hours");
    }
}
