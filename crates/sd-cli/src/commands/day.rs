//! Day inspection and deletion.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use sd_core::UserId;
use sd_db::Database;

use super::{confirm, store_error};
use crate::render::render_summary;
use crate::resolve::resolve_date;

/// Shows the summary for one date, as text or JSON.
pub fn show<W: Write>(
    writer: &mut W,
    db: &Database,
    user: UserId,
    date_input: &str,
    json: bool,
) -> Result<()> {
    let date = resolve_date(date_input, Local::now().date_naive())?;
    let summary = db
        .day_summary(user, date)
        .map_err(|err| store_error("summary", err))?;
    if json {
        serde_json::to_writer_pretty(&mut *writer, &summary)?;
        writeln!(writer)?;
    } else {
        render_summary(writer, &summary)?;
    }
    Ok(())
}

/// Deletes a date's record, naps, and symptoms after a preview.
pub fn rm<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: UserId,
    date_input: &str,
    assume_yes: bool,
) -> Result<()> {
    let date = resolve_date(date_input, Local::now().date_naive())?;
    let summary = db
        .day_summary(user, date)
        .map_err(|err| store_error("summary", err))?;

    if summary.is_empty() {
        writeln!(writer, "Nothing recorded for {date}.")?;
        return Ok(());
    }

    writeln!(writer, "This will delete everything recorded for:")?;
    render_summary(writer, &summary)?;
    if !assume_yes && !confirm("Delete this day? [y/N] ")? {
        writeln!(writer, "Cancelled.")?;
        return Ok(());
    }

    db.delete_day(user, date)
        .map_err(|err| store_error("day deletion", err))?;
    writeln!(writer, "Deleted {date}.")?;
    Ok(())
}

/// Lists dates that have any data, newest first.
pub fn list<W: Write>(writer: &mut W, db: &Database, user: UserId, limit: u32) -> Result<()> {
    let listings = db
        .list_days_with_any_data(user, limit)
        .map_err(|err| store_error("day listing", err))?;

    if listings.is_empty() {
        writeln!(writer, "No diary entries yet.")?;
        return Ok(());
    }

    for listing in listings {
        if listing.has_primary_data {
            writeln!(writer, "{}", listing.date)?;
        } else {
            writeln!(writer, "{} (naps/symptoms only)", listing.date)?;
        }
    }
    Ok(())
}
