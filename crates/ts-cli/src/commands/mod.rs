//! CLI subcommand implementations.

pub mod echo;
pub mod show;
pub mod tally;
