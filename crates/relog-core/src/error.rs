//! Core error types.

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] relog_git::GitError),

    /// A configured regex does not compile.
    #[error("invalid {name} pattern: {source}")]
    InvalidPattern {
        /// Which pattern failed.
        name: &'static str,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
