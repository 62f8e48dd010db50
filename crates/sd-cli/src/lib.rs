//! Sleep diary CLI library.
//!
//! This crate is the conversational front-end to the diary core: it
//! resolves free-text times and dates, asks for confirmation before
//! destructive overwrites, and renders summaries. The core never sees
//! unvalidated input.

mod cli;
pub mod commands;
mod config;
pub mod render;
pub mod resolve;

pub use cli::{Cli, Commands, DayAction, NapAction, SymptomAction};
pub use config::Config;
