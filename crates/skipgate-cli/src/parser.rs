//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for conditional test skipping.
#[derive(Parser)]
#[command(name = "skipgate")]
#[command(about = "Decide whether tests should be skipped on this machine")]
#[command(version)]
pub struct Cli {
    /// Load settings from a JSON file instead of SKIPGATE_* variables
    #[arg(long = "settings", env = "SKIPGATE_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
