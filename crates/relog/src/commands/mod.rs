//! Subcommand implementations.

pub mod changelog;
pub mod init;
