//! Git error types.

use std::path::PathBuf;

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(PathBuf),

    /// Tag not found.
    #[error("could not find the tag: {0}")]
    TagNotFound(String),

    /// The repository has no tags.
    #[error("git-tag does not exist")]
    NoTags,

    /// The tag query could not be parsed.
    #[error("failed to parse the query: {0}")]
    InvalidQuery(String),

    /// A git command exited unsuccessfully.
    #[error("`git {command}` failed: {stderr}")]
    CommandFailed {
        /// The subcommand and its arguments.
        command: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;
