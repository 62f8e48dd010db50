use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sd_cli::commands::{day, nap, recent, record, symptom};
use sd_cli::{Cli, Commands, Config, DayAction, NapAction, SymptomAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<sd_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    sd_db::Database::open(&config.database_path).context("failed to open database")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut db = open_database(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();
    let user = cli.user;

    match &cli.command {
        Commands::Init {
            username,
            first_name,
            last_name,
        } => {
            db.upsert_user(user, username, first_name, last_name)
                .context("failed to register user")?;
            writeln!(stdout, "Registered user {user}.")?;
        }
        Commands::Sleep { time, date } => {
            record::sleep(&mut stdout, &mut db, user, time, date)?;
        }
        Commands::Wake { time, date } => {
            record::wake(&mut stdout, &mut db, user, time, date)?;
        }
        Commands::NoSleep { date, yes } => {
            record::no_sleep(&mut stdout, &mut db, user, date, *yes)?;
        }
        Commands::Nap { action } => match action {
            NapAction::Add { sleep, wake, date } => {
                nap::add(&mut stdout, &mut db, user, sleep, wake, date)?;
            }
            NapAction::Rm { id } => {
                nap::rm(&mut stdout, &mut db, *id)?;
            }
        },
        Commands::Symptom { action } => match action {
            SymptomAction::Add { text, date } => {
                symptom::add(&mut stdout, &mut db, user, &text.join(" "), date)?;
            }
            SymptomAction::Rm { id } => {
                symptom::rm(&mut stdout, &mut db, *id)?;
            }
        },
        Commands::Day { action } => match action {
            DayAction::Show { date, json } => {
                day::show(&mut stdout, &db, user, date, *json)?;
            }
            DayAction::Rm { date, yes } => {
                day::rm(&mut stdout, &mut db, user, date, *yes)?;
            }
            DayAction::List { limit } => {
                day::list(&mut stdout, &db, user, *limit)?;
            }
        },
        Commands::Recent { count, json } => {
            recent::run(&mut stdout, &db, user, *count, *json)?;
        }
    }

    Ok(())
}
