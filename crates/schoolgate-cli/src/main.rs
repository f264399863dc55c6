//! `schoolgate` command-line tool

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Cli;
use schoolgate_validate::config::{load_dotenv, GuardConfig};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    load_dotenv();
    let config = GuardConfig::from_env()?;
    logging::init(&config);

    let passed = cli.execute(&config)?;

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
