//! Read-only per-day summaries.
//!
//! A summary combines the primary [`DayRecord`] with that date's naps and
//! symptom notes. Building one never mutates stored state; the storage
//! layer runs the queries and hands the rows to [`DaySummary::build`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::day::DayRecord;

/// A supplementary sleep segment beyond the primary nighttime span.
///
/// Both endpoints are known at creation and the duration is fixed then;
/// naps are never updated, only added or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nap {
    pub id: i64,
    pub sleep_at: NaiveDateTime,
    pub wake_at: NaiveDateTime,
    pub duration_minutes: i64,
}

/// A free-text symptom note for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: i64,
    pub text: String,
}

/// Aggregated view of one diary day.
///
/// `total_sleep_minutes` is absent when the primary span is incomplete;
/// `total_all_minutes` always has a value (primary minutes or zero, plus
/// the sum of nap durations) so callers never confuse absent with zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub sleep_at: Option<NaiveDateTime>,
    pub wake_at: Option<NaiveDateTime>,
    pub no_sleep: bool,
    pub total_sleep_minutes: Option<i64>,
    pub total_all_minutes: i64,
    /// Naps ordered by their sleep time.
    pub naps: Vec<Nap>,
    /// Symptom notes in insertion order.
    pub symptoms: Vec<Symptom>,
}

impl DaySummary {
    /// Builds a summary from the day record (if any) and its naps and symptoms.
    #[must_use]
    pub fn build(
        date: NaiveDate,
        record: Option<DayRecord>,
        naps: Vec<Nap>,
        symptoms: Vec<Symptom>,
    ) -> Self {
        let record = record.unwrap_or_default();
        let nap_minutes: i64 = naps.iter().map(|nap| nap.duration_minutes).sum();
        let total_all_minutes = record.total_sleep_minutes.unwrap_or(0) + nap_minutes;
        Self {
            date,
            sleep_at: record.sleep_at,
            wake_at: record.wake_at,
            no_sleep: record.no_sleep,
            total_sleep_minutes: record.total_sleep_minutes,
            total_all_minutes,
            naps,
            symptoms,
        }
    }

    /// Builds the summary of a date with no data at all.
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self::build(date, None, Vec::new(), Vec::new())
    }

    /// Returns true when the day has neither primary data, naps, nor symptoms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sleep_at.is_none()
            && self.wake_at.is_none()
            && !self.no_sleep
            && self.naps.is_empty()
            && self.symptoms.is_empty()
    }
}
