//! CLI interface: command definitions and terminal output helpers.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Multi-robot collaboration plan evaluator.
#[derive(Debug, Parser)]
#[command(name = "arbiter", version, about)]
pub struct Cli {
    /// Emit machine-readable JSON instead of styled output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Judge one plan against one ground-truth record
    Judge {
        /// Plan file: a JSON array of steps
        #[arg(long)]
        plan: PathBuf,

        /// Ground-truth record file
        #[arg(long)]
        truth: PathBuf,

        /// RNG seed for initial-position sampling (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evaluate every record of a dataset against its own reference plan
    Run {
        /// Dataset file: a JSON array of task records
        #[arg(short, long)]
        data: PathBuf,

        /// RNG seed for initial-position sampling (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
}
