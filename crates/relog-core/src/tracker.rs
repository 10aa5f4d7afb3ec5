//! Issue tracker seam.

use relog_commit::JiraIssue;
use thiserror::Error;

/// Issue tracker errors.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The issue does not exist.
    #[error("issue not found: {0}")]
    NotFound(String),
}

/// Looks up issues referenced by commit headers.
pub trait IssueTracker {
    /// Fetches the issue with the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be fetched.
    fn issue(&self, id: &str) -> Result<JiraIssue, TrackerError>;
}
