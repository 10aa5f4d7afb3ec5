//! Configuration management for Relog.
//!
//! This crate handles loading the `relog.toml` configuration file, which
//! holds the patterns, keywords and field paths driving commit parsing,
//! filtering, grouping and sorting.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    CONFIG_FILE_NAME, find_and_load_config, find_and_load_config_from, load_config, write_config,
};
pub use schema::{
    CommitGroupsConfig, CommitsConfig, Config, GroupSortBy, JiraConfig, NotesConfig,
    PatternConfig, RefsConfig,
};
