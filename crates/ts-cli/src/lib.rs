//! Timesheet hour histogram CLI library.
//!
//! This crate provides the CLI interface over `ts-core` and `ts-sheet`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
