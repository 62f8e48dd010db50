//! Sleep, wake, and no-sleep recording.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use sd_core::UserId;
use sd_db::Database;

use super::{confirm, store_error};
use crate::render::render_summary;
use crate::resolve::{resolve_date, resolve_timestamp};

/// Records the primary sleep time for a diary date.
pub fn sleep<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: UserId,
    time: &str,
    date_input: &str,
) -> Result<()> {
    let date = resolve_date(date_input, Local::now().date_naive())?;
    let sleep_at = resolve_timestamp(time, date)?;

    if let Some(prior) = db
        .lookup_day(user, date)
        .map_err(|err| store_error("lookup", err))?
        .and_then(|record| record.sleep_at)
    {
        writeln!(
            writer,
            "note: replacing earlier sleep time {}",
            prior.format("%H:%M")
        )?;
    }

    db.record_primary_sleep(user, sleep_at, date)
        .map_err(|err| store_error("sleep entry", err))?;
    writeln!(writer, "Recorded sleep at {} for:", sleep_at.format("%H:%M"))?;
    let summary = db
        .day_summary(user, date)
        .map_err(|err| store_error("summary", err))?;
    render_summary(writer, &summary)
}

/// Records the primary wake time for a diary date.
pub fn wake<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: UserId,
    time: &str,
    date_input: &str,
) -> Result<()> {
    let date = resolve_date(date_input, Local::now().date_naive())?;
    let wake_at = resolve_timestamp(time, date)?;

    if let Some(prior) = db
        .lookup_day(user, date)
        .map_err(|err| store_error("lookup", err))?
        .and_then(|record| record.wake_at)
    {
        writeln!(
            writer,
            "note: replacing earlier wake time {}",
            prior.format("%H:%M")
        )?;
    }

    db.record_primary_wake(user, wake_at, date)
        .map_err(|err| store_error("wake entry", err))?;
    writeln!(writer, "Recorded wake at {} for:", wake_at.format("%H:%M"))?;
    let summary = db
        .day_summary(user, date)
        .map_err(|err| store_error("summary", err))?;
    render_summary(writer, &summary)
}

/// Marks a date as sleepless after showing what would be overwritten.
pub fn no_sleep<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: UserId,
    date_input: &str,
    assume_yes: bool,
) -> Result<()> {
    let date = resolve_date(date_input, Local::now().date_naive())?;

    let existing = db
        .lookup_day(user, date)
        .map_err(|err| store_error("lookup", err))?;
    if existing.is_some_and(|record| !record.is_empty()) {
        writeln!(writer, "This will clear the recorded times for:")?;
        let summary = db
            .day_summary(user, date)
            .map_err(|err| store_error("summary", err))?;
        render_summary(writer, &summary)?;
        if !assume_yes && !confirm("Mark as sleepless anyway? [y/N] ")? {
            writeln!(writer, "Cancelled.")?;
            return Ok(());
        }
    }

    db.record_no_sleep(user, date)
        .map_err(|err| store_error("no-sleep override", err))?;
    writeln!(writer, "Marked {date} as a sleepless night.")?;
    Ok(())
}
