//! CLI definition.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Turn Git history into structured changelog data.
#[derive(Debug, Parser)]
#[command(name = "relog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default relog.toml
    Init(commands::init::InitArgs),

    /// Extract grouped changes for a tag query as JSON
    Changelog(commands::changelog::ChangelogArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args) => commands::init::run(args),
            Commands::Changelog(args) => commands::changelog::run(args),
        }
    }
}
