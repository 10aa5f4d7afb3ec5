//! Git access for Relog.
//!
//! This crate provides the version-control collaborators of the pipeline:
//! - [`GitClient`]: log and changed-file queries, with a `git` CLI backend
//! - [`Repository`]: tag listing and tag-query resolution

mod client;
mod error;
mod repository;

#[cfg(test)]
mod testing;

pub use client::{GitCli, GitClient};
pub use error::{GitError, GitResult};
pub use repository::Repository;
