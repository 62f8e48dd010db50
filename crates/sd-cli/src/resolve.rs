//! Free-text time and date resolution.
//!
//! All parsing of user input happens here, before anything reaches the
//! diary core. The core assumes pre-validated timestamps and an explicit
//! bucket date.

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Resolves a date word into a concrete calendar date.
///
/// Accepts `today`, `yesterday`, or `YYYY-MM-DD`.
pub fn resolve_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    match input.trim() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        other => match NaiveDate::parse_from_str(other, "%Y-%m-%d") {
            Ok(date) => Ok(date),
            Err(_) => bail!("invalid date '{other}': expected today, yesterday, or YYYY-MM-DD"),
        },
    }
}

/// Resolves a time string into a timestamp on the given diary date.
///
/// Accepts `HH:MM` (combined with `date`) or a full `YYYY-MM-DD HH:MM`,
/// which lets an entry be explicitly back-dated to a timestamp outside its
/// diary date (e.g., falling asleep after midnight).
pub fn resolve_timestamp(input: &str, date: NaiveDate) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Ok(time) = NaiveTime::parse_from_str(input, "%H:%M") {
        return Ok(date.and_time(time));
    }
    match NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        Ok(timestamp) => Ok(timestamp),
        Err(_) => bail!("invalid time '{input}': expected HH:MM or YYYY-MM-DD HH:MM"),
    }
}

/// Resolves a nap's wake time against its already-resolved sleep time.
///
/// A wake clock time at or before the sleep time rolls over to the next
/// day, matching how the times are read back later.
pub fn resolve_nap_wake(input: &str, sleep_at: NaiveDateTime, date: NaiveDate) -> Result<NaiveDateTime> {
    let wake_at = resolve_timestamp(input, date)?;
    if wake_at <= sleep_at {
        Ok(wake_at + Duration::days(1))
    } else {
        Ok(wake_at)
    }
}
