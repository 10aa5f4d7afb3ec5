//! Initialize command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use relog_config::{CONFIG_FILE_NAME, Config, write_config};
use tracing::info;

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Where to write the configuration
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub path: PathBuf,
}

/// Runs the init command.
pub fn run(args: InitArgs) -> Result<()> {
    write_config(&args.path, &Config::default(), args.force)
        .with_context(|| format!("failed to initialize {}", args.path.display()))?;

    info!(path = ?args.path, "configuration created");
    println!("Created {}", args.path.display());
    Ok(())
}
