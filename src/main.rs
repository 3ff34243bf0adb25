//! Arbiter CLI entry point

use anyhow::{Context, Result};
use clap::Parser;

use arbiter::cli::{
    commands::{judge, run},
    Cli, Commands,
};
use arbiter::infrastructure::{logging, ConfigLoader};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ConfigLoader::load().context("Failed to load configuration")?;
    logging::init(&config.log);

    match cli.command {
        Commands::Judge { plan, truth, seed } => {
            judge::handle_judge(&plan, &truth, seed.unwrap_or(config.seed), cli.json)
        }
        Commands::Run { data, seed } => {
            run::handle_run(&data, seed.unwrap_or(config.seed), cli.json)
        }
    }
}
