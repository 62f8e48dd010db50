//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sd_core::UserId;

/// Personal sleep diary.
///
/// Tracks nightly sleep, naps, and daily symptoms, keeping one canonical
/// record per calendar day. Times are naive local clock times; a wake time
/// earlier than its sleep time is taken to mean the sleep crossed midnight.
#[derive(Debug, Parser)]
#[command(name = "sd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Diary user ID. The default single local profile is 1.
    #[arg(short, long, global = true, default_value = "1")]
    pub user: UserId,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register or update the user profile.
    Init {
        /// Account name shown in exports.
        #[arg(long, default_value = "")]
        username: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Record when you fell asleep (e.g. `sd sleep 23:30`).
    Sleep {
        /// Time as HH:MM, or a full `YYYY-MM-DD HH:MM` timestamp.
        time: String,

        /// Diary date the entry belongs to: `today`, `yesterday`, or
        /// `YYYY-MM-DD`. A sleep entered after midnight may still belong
        /// to the previous diary day, so the date is never derived from
        /// the time.
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Record when you woke up.
    Wake {
        /// Time as HH:MM, or a full `YYYY-MM-DD HH:MM` timestamp.
        time: String,

        /// Diary date the entry belongs to.
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Mark a date as sleepless, clearing any recorded times.
    NoSleep {
        /// Diary date to override.
        #[arg(short, long, default_value = "today")]
        date: String,

        /// Skip the confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Manage daytime naps.
    Nap {
        #[command(subcommand)]
        action: NapAction,
    },

    /// Manage symptom notes.
    Symptom {
        #[command(subcommand)]
        action: SymptomAction,
    },

    /// Inspect or delete whole diary days.
    Day {
        #[command(subcommand)]
        action: DayAction,
    },

    /// Show the last few days at a glance.
    Recent {
        /// Number of days to show, most recent first.
        #[arg(short = 'n', long, default_value_t = 3)]
        count: u32,

        /// Output as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// Nap subcommands.
#[derive(Debug, Subcommand)]
pub enum NapAction {
    /// Add a nap with both endpoints known.
    Add {
        /// Nap start time (HH:MM).
        sleep: String,

        /// Nap end time (HH:MM). An end at or before the start rolls over
        /// to the next day.
        wake: String,

        /// Diary date the nap belongs to.
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Delete a nap by its ID (shown in `sd day show`).
    Rm {
        id: i64,
    },
}

/// Symptom subcommands.
#[derive(Debug, Subcommand)]
pub enum SymptomAction {
    /// Add a free-text symptom note.
    Add {
        /// The note text; multiple words are joined with spaces.
        #[arg(required = true)]
        text: Vec<String>,

        /// Diary date the note belongs to.
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Delete a symptom note by its ID (shown in `sd day show`).
    Rm {
        id: i64,
    },
}

/// Day subcommands.
#[derive(Debug, Subcommand)]
pub enum DayAction {
    /// Show the summary for one date.
    Show {
        /// `today`, `yesterday`, or `YYYY-MM-DD`.
        #[arg(default_value = "today")]
        date: String,

        /// Output as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Delete a date's record, naps, and symptoms.
    Rm {
        /// `today`, `yesterday`, or `YYYY-MM-DD`.
        date: String,

        /// Skip the confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List dates that have any data.
    List {
        /// Maximum number of dates to list.
        #[arg(short, long, default_value_t = 30)]
        limit: u32,
    },
}
