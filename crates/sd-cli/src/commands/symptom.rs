//! Symptom note management.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use sd_core::UserId;
use sd_db::Database;

use super::store_error;
use crate::resolve::resolve_date;

/// Adds a free-text symptom note to a diary date.
pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: UserId,
    text: &str,
    date_input: &str,
) -> Result<()> {
    let date = resolve_date(date_input, Local::now().date_naive())?;
    let id = db
        .add_symptom(user, text, date)
        .map_err(|err| store_error("symptom", err))?;
    writeln!(writer, "Added symptom [{id}] to {date}: {text}")?;
    Ok(())
}

/// Deletes a symptom note by ID.
pub fn rm<W: Write>(writer: &mut W, db: &mut Database, id: i64) -> Result<()> {
    let removed = db
        .delete_symptom(id)
        .map_err(|err| store_error("symptom deletion", err))?;
    if removed {
        writeln!(writer, "Deleted symptom [{id}].")?;
    } else {
        writeln!(writer, "No symptom with ID {id}.")?;
    }
    Ok(())
}
