//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::tally::TallyArgs;

/// Timesheet hour histograms.
///
/// Reads a directory of weekly timesheet exports and sums the hours worked
/// into each hour of the day, overall and per weekday.
#[derive(Debug, Parser)]
#[command(name = "tsum", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sum every timesheet in a directory into hour histograms.
    Tally(TallyArgs),

    /// Print one timesheet's cells and per-day hours.
    Show {
        /// The timesheet export to read.
        path: PathBuf,
    },
}
