//! Human-readable rendering of summaries.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use sd_core::DaySummary;

/// Formats a minute count as a duration string.
///
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour. Stored durations are
/// clamped non-negative at computation time, so the negative branch only
/// covers direct callers; it renders as "0m", matching what the store
/// would have persisted.
#[must_use]
pub fn format_minutes(minutes: i64) -> String {
    if minutes < 0 {
        return "0m".to_string();
    }
    let hours = minutes / 60;
    let remainder = minutes % 60;
    if hours >= 1 {
        format!("{hours}h {remainder}m")
    } else {
        format!("{remainder}m")
    }
}

fn clock(timestamp: NaiveDateTime) -> String {
    timestamp.format("%H:%M").to_string()
}

/// Writes the text rendering of one day summary.
pub fn render_summary<W: Write>(writer: &mut W, summary: &DaySummary) -> Result<()> {
    writeln!(writer, "{}", summary.date)?;

    if summary.is_empty() {
        writeln!(writer, "  no data")?;
        return Ok(());
    }

    if summary.no_sleep {
        writeln!(writer, "  sleepless night")?;
    } else {
        let sleep = summary.sleep_at.map_or_else(|| "--:--".to_string(), clock);
        let wake = summary.wake_at.map_or_else(|| "--:--".to_string(), clock);
        let night = summary
            .total_sleep_minutes
            .map_or_else(|| "incomplete".to_string(), format_minutes);
        writeln!(writer, "  sleep {sleep}  wake {wake}  night {night}")?;
    }

    if !summary.naps.is_empty() {
        writeln!(writer, "  naps:")?;
        for nap in &summary.naps {
            writeln!(
                writer,
                "    [{}] {} - {} ({})",
                nap.id,
                clock(nap.sleep_at),
                clock(nap.wake_at),
                format_minutes(nap.duration_minutes)
            )?;
        }
    }

    if !summary.symptoms.is_empty() {
        writeln!(writer, "  symptoms:")?;
        for symptom in &summary.symptoms {
            writeln!(writer, "    [{}] {}", symptom.id, symptom.text)?;
        }
    }

    writeln!(
        writer,
        "  total sleep: {}",
        format_minutes(summary.total_all_minutes)
    )?;
    Ok(())
}
