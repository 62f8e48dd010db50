//! Duration arithmetic and timestamp formatting.
//!
//! Timestamps are naive local times; the diary does no timezone handling.
//! The storage layer persists them as ISO 8601 TEXT so lexicographic
//! ordering matches chronological ordering.
//!
//! Calendar bucketing is always caller-supplied: a sleep entered shortly
//! after midnight may still belong to the previous diary day, so no
//! function here derives a bucket date from a timestamp.

use chrono::{Duration, NaiveDate, NaiveDateTime, ParseError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Computes the length of a sleep span in whole minutes.
///
/// A wake time earlier than its sleep time is interpreted as crossing
/// midnight: 24 hours are added to the wake time before differencing.
/// A wake more than a day before the sleep is outside what that
/// correction models, so the result is clamped; the return value is
/// always non-negative.
///
/// The same rule applies to the primary nighttime span and to naps.
#[must_use]
pub fn compute_duration(sleep_at: NaiveDateTime, wake_at: NaiveDateTime) -> i64 {
    let wake_at = if wake_at < sleep_at {
        wake_at + Duration::hours(24)
    } else {
        wake_at
    };
    (wake_at - sleep_at).num_minutes().max(0)
}

/// Formats a timestamp for database storage.
#[must_use]
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp stored by [`format_timestamp`].
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

/// Formats a calendar date for database storage.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a date stored by [`format_date`].
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn duration_within_one_day() {
        let sleep = ts("2025-11-08T23:30:00");
        let wake = ts("2025-11-09T07:00:00");
        assert_eq!(compute_duration(sleep, wake), 450);
    }

    #[test]
    fn duration_applies_midnight_crossing_correction() {
        // Wake "before" sleep in clock terms: assume the next day.
        let sleep = ts("2025-11-08T23:30:00");
        let wake = ts("2025-11-08T07:00:00");
        assert_eq!(compute_duration(sleep, wake), 450);
    }

    #[test]
    fn duration_of_zero_length_span() {
        let at = ts("2025-11-08T23:30:00");
        assert_eq!(compute_duration(at, at), 0);
    }

    #[test]
    fn duration_clamps_wake_more_than_a_day_before_sleep() {
        // One 24h correction cannot bring this wake past the sleep time;
        // the span must still never be negative.
        let sleep = ts("2025-11-10T23:00:00");
        let wake = ts("2025-11-08T07:00:00");
        assert_eq!(compute_duration(sleep, wake), 0);
    }

    #[test]
    fn duration_truncates_partial_minutes() {
        let sleep = ts("2025-11-08T23:00:00");
        let wake = ts("2025-11-08T23:30:45");
        assert_eq!(compute_duration(sleep, wake), 30);
    }

    #[test]
    fn timestamp_roundtrip() {
        let original = ts("2025-01-15T10:30:00");
        let formatted = format_timestamp(original);
        assert_eq!(formatted, "2025-01-15T10:30:00");
        assert_eq!(parse_timestamp(&formatted).unwrap(), original);
    }

    #[test]
    fn date_roundtrip() {
        let original = parse_date("2025-01-15").unwrap();
        assert_eq!(format_date(original), "2025-01-15");
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not-a-timestamp").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }
}
