//! CLI argument parsing

use crate::commands::{self, BatchArgs, CheckArgs, TextArgs};
use clap::{Parser, Subcommand};
use schoolgate_validate::config::GuardConfig;

/// SchoolGate - check portal inputs from the shell
#[derive(Parser, Debug)]
#[command(name = "schoolgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one value as a given field kind
    Check(CheckArgs),

    /// List the injection detectors that match a value
    Scan(TextArgs),

    /// Escape a value for HTML display
    Escape(TextArgs),

    /// Sanitize a value
    Sanitize(TextArgs),

    /// Validate a JSON record
    Batch(BatchArgs),
}

impl Cli {
    /// Execute the CLI command. `Ok(false)` means the input was rejected.
    pub fn execute(self, config: &GuardConfig) -> anyhow::Result<bool> {
        let json = self.json;
        match self.command {
            Commands::Check(args) => commands::check(args, config, json),
            Commands::Scan(args) => commands::scan(args, json),
            Commands::Escape(args) => commands::escape(args, json),
            Commands::Sanitize(args) => commands::sanitize(args, json),
            Commands::Batch(args) => commands::batch(args, config, json),
        }
    }
}
