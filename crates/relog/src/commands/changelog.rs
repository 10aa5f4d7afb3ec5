//! Changelog command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use relog_config::{Config, ConfigError, find_and_load_config, load_config};
use relog_core::Pipeline;
use relog_git::Repository;
use tracing::{debug, info};

/// Arguments for the changelog command.
#[derive(Debug, Args)]
pub struct ChangelogArgs {
    /// Tag query: `A`, `A..B`, `A..` or `..B` (default: the whole history)
    #[arg(default_value = "")]
    pub query: String,

    /// Configuration file (default: relog.toml in the current directory or a parent)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Runs the changelog command.
pub fn run(args: ChangelogArgs) -> Result<()> {
    let config = load(args.config.as_ref())?;

    let repo = Repository::discover(".").context("failed to open repository")?;
    let revision = repo.resolve_query(&args.query)?;

    let pipeline = Pipeline::from_config(Box::new(repo.client()), &config)?;
    let changes = pipeline.run(&revision)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&changes)?
    } else {
        serde_json::to_string(&changes)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(?path, "changes written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn load(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => match find_and_load_config() {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => {
                debug!("no configuration file found, using defaults");
                Ok(Config::default())
            }
            Err(err) => Err(err.into()),
        },
    }
}
