//! CLI subcommand implementations.

use std::io::{self, Write};

use anyhow::Result;
use sd_db::{DbError, FailureKind};

pub mod day;
pub mod nap;
pub mod recent;
pub mod record;
pub mod symptom;

/// Logs a storage failure and wraps it with a user-facing retry hint.
///
/// Storage errors never abort the process; the command reports a definite
/// failure and exits, leaving the diary unchanged.
pub(crate) fn store_error(action: &str, err: DbError) -> anyhow::Error {
    tracing::error!(error = %err, action, "store operation failed");
    let hint = match err.kind() {
        FailureKind::PersistenceUnavailable => "storage is busy or unavailable, try again",
        FailureKind::ConstraintViolation => "a conflicting record rejected the write",
        FailureKind::Unknown => "unexpected storage failure",
    };
    anyhow::anyhow!("{action} was not saved: {hint} ({err})")
}

/// Prompts on stdout and reads a yes/no answer from stdin.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
