//! caselex CLI binary.

use anyhow::Context;
use caselex::cli::args::CaselexArgs;
use caselex::cli::commands::execute_command;
use clap::Parser;
use log::LevelFilter;

fn main() -> anyhow::Result<()> {
    let args = CaselexArgs::parse();

    let level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    execute_command(args).context("command failed")?;
    Ok(())
}
