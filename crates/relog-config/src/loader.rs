//! Configuration loader.

use std::path::Path;

use tracing::{debug, warn};

use crate::{Config, ConfigError, ConfigResult, GroupSortBy};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "relog.toml";

/// Loads configuration from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;

    Ok(config)
}

/// Finds and loads configuration from the current directory or parents.
///
/// # Errors
///
/// Returns an error if no configuration file is found or it cannot be parsed.
pub fn find_and_load_config() -> ConfigResult<Config> {
    let current_dir = std::env::current_dir()?;
    find_and_load_config_from(&current_dir)
}

/// Finds and loads configuration starting from the given directory.
///
/// Walks up the directory tree until a configuration file is found.
///
/// # Errors
///
/// Returns an error if no configuration file is found or it cannot be parsed.
pub fn find_and_load_config_from(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    let start_dir = start_dir.as_ref();
    let mut dir = start_dir;

    loop {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return load_config(config_path);
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    Err(ConfigError::NotFound(start_dir.join(CONFIG_FILE_NAME)))
}

/// Writes `config` as TOML to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
///
/// # Errors
///
/// Returns an error if the file exists, or cannot be serialized or written.
pub fn write_config(path: impl AsRef<Path>, config: &Config, force: bool) -> ConfigResult<()> {
    let path = path.as_ref();
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    debug!(?path, "configuration written");
    Ok(())
}

fn validate(config: &Config) -> ConfigResult<()> {
    if config.commit_groups.group_by.is_empty() {
        return Err(ConfigError::Invalid(
            "commit_groups.group_by must not be empty".to_string(),
        ));
    }

    for pattern in [&config.header, &config.merge, &config.revert] {
        if pattern.pattern.is_some() && pattern.pattern_maps.is_empty() {
            debug!(pattern = ?pattern.pattern, "pattern has no field names bound");
        }
    }

    if config.commit_groups.sort_by == GroupSortBy::Custom
        && config.commit_groups.title_order.is_empty()
    {
        warn!("commit_groups.sort_by is \"Custom\" but title_order is empty");
    }

    Ok(())
}
