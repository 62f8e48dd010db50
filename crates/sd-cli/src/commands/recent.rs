//! Recent-days overview.

use std::io::Write;

use anyhow::Result;
use sd_core::{DaySummary, UserId};
use sd_db::Database;

use super::store_error;
use crate::render::render_summary;

/// Shows summaries for the last `count` days, most recent first.
///
/// The store always yields exactly `count` entries, empty days included,
/// so the positional labels stay stable.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user: UserId,
    count: u32,
    json: bool,
) -> Result<()> {
    let summaries = db
        .recent_days(user, count)
        .map_err(|err| store_error("recent days", err))?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &summaries)?;
        writeln!(writer)?;
        return Ok(());
    }

    render_all(writer, &summaries)
}

fn render_all<W: Write>(writer: &mut W, summaries: &[DaySummary]) -> Result<()> {
    for (i, summary) in summaries.iter().enumerate() {
        match i {
            0 => writeln!(writer, "Today:")?,
            1 => writeln!(writer, "Yesterday:")?,
            2 => writeln!(writer, "Day before:")?,
            _ => {}
        }
        render_summary(writer, summary)?;
    }
    Ok(())
}
