//! Core domain logic for the sleep diary.
//!
//! This crate contains the fundamental types and logic for:
//! - Duration arithmetic: computing sleep spans, including spans crossing midnight
//! - Day reconciliation: merging sleep/wake/no-sleep events into one record per day
//! - Summaries: read-only per-day aggregates of primary sleep, naps, and symptoms
//!
//! No I/O happens here; persistence lives in `sd-db`.

pub mod day;
pub mod summary;
pub mod time;
pub mod types;

pub use day::{DayRecord, DayState};
pub use summary::{DaySummary, Nap, Symptom};
pub use time::compute_duration;
pub use types::{UserId, ValidationError};
