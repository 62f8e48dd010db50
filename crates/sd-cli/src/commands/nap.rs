//! Nap management.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use sd_core::UserId;
use sd_db::Database;

use super::store_error;
use crate::render::format_minutes;
use crate::resolve::{resolve_date, resolve_nap_wake, resolve_timestamp};

/// Adds a fully-specified nap to a diary date.
pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: UserId,
    sleep: &str,
    wake: &str,
    date_input: &str,
) -> Result<()> {
    let date = resolve_date(date_input, Local::now().date_naive())?;
    let sleep_at = resolve_timestamp(sleep, date)?;
    let wake_at = resolve_nap_wake(wake, sleep_at, date)?;

    let id = db
        .add_nap(user, sleep_at, wake_at, date)
        .map_err(|err| store_error("nap", err))?;

    let summary = db
        .day_summary(user, date)
        .map_err(|err| store_error("summary", err))?;
    let nap = summary.naps.iter().find(|nap| nap.id == id);
    let duration = nap.map_or(0, |nap| nap.duration_minutes);
    writeln!(
        writer,
        "Added nap [{id}] {} - {} ({}) to {date}",
        sleep_at.format("%H:%M"),
        wake_at.format("%H:%M"),
        format_minutes(duration)
    )?;
    Ok(())
}

/// Deletes a nap by ID.
pub fn rm<W: Write>(writer: &mut W, db: &mut Database, id: i64) -> Result<()> {
    let removed = db.delete_nap(id).map_err(|err| store_error("nap deletion", err))?;
    if removed {
        writeln!(writer, "Deleted nap [{id}].")?;
    } else {
        writeln!(writer, "No nap with ID {id}.")?;
    }
    Ok(())
}
