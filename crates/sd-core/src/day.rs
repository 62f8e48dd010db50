//! Day reconciliation: merging sleep/wake/no-sleep events into the
//! canonical record for one (user, date) pair.
//!
//! The record is a value type; the storage layer loads the current row,
//! applies one of the `apply_*` methods, and writes the result back inside
//! a single transaction. All merge rules live here so they can be tested
//! without a database.
//!
//! # State machine
//!
//! Over the tuple `(sleep_at, wake_at, no_sleep)`:
//!
//! - Empty → sleep → `SleepOnly`; Empty → wake → `WakeOnly`
//! - `SleepOnly` + wake, or `WakeOnly` + sleep → `Complete` (duration computed)
//! - `Complete` + sleep or wake → `Complete` (that endpoint overwritten,
//!   duration recomputed against the retained endpoint)
//! - any state + no-sleep → `NoSleep` (endpoints cleared, duration zeroed)
//! - `NoSleep` + sleep or wake → back into the states above (flag cleared)
//!
//! A new event of a given kind always overwrites the prior value of that
//! kind; two sleep times are never merged. Duration is always recomputed
//! from whichever endpoint pair is currently present, never carried stale.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::time::compute_duration;

/// The canonical sleep entry for one user on one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Start of the primary nighttime sleep span, if recorded.
    pub sleep_at: Option<NaiveDateTime>,
    /// End of the primary nighttime sleep span, if recorded.
    pub wake_at: Option<NaiveDateTime>,
    /// Primary span length in minutes; present only when derivable.
    pub total_sleep_minutes: Option<i64>,
    /// Destructive override marking the date as sleepless.
    pub no_sleep: bool,
}

/// Reconciliation state of a [`DayRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Empty,
    SleepOnly,
    WakeOnly,
    Complete,
    NoSleep,
}

impl DayRecord {
    /// Records the primary sleep time, overwriting any prior value.
    ///
    /// Clears the no-sleep flag and recomputes the duration against the
    /// retained wake time, if one is present.
    pub fn apply_sleep(&mut self, sleep_at: NaiveDateTime) {
        self.sleep_at = Some(sleep_at);
        self.no_sleep = false;
        self.recompute();
    }

    /// Records the primary wake time, overwriting any prior value.
    pub fn apply_wake(&mut self, wake_at: NaiveDateTime) {
        self.wake_at = Some(wake_at);
        self.no_sleep = false;
        self.recompute();
    }

    /// Marks the date as sleepless, clearing both endpoints.
    ///
    /// This is a destructive override; callers are expected to warn before
    /// invoking it. Idempotent.
    pub fn apply_no_sleep(&mut self) {
        self.sleep_at = None;
        self.wake_at = None;
        self.total_sleep_minutes = Some(0);
        self.no_sleep = true;
    }

    fn recompute(&mut self) {
        self.total_sleep_minutes = match (self.sleep_at, self.wake_at) {
            (Some(sleep_at), Some(wake_at)) => Some(compute_duration(sleep_at, wake_at)),
            _ => None,
        };
    }

    /// Returns which reconciliation state the record is in.
    #[must_use]
    pub const fn state(&self) -> DayState {
        if self.no_sleep {
            return DayState::NoSleep;
        }
        match (self.sleep_at.is_some(), self.wake_at.is_some()) {
            (false, false) => DayState::Empty,
            (true, false) => DayState::SleepOnly,
            (false, true) => DayState::WakeOnly,
            (true, true) => DayState::Complete,
        }
    }

    /// Returns true when the record carries no primary data at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.state(), DayState::Empty)
    }
}
