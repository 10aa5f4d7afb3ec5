//! Commit post-processing seam.

use relog_commit::Commit;

/// Rewrites or drops commits after parsing.
pub trait CommitProcessor {
    /// Returns the processed commit, or `None` to drop it.
    fn process(&self, commit: Commit) -> Option<Commit>;
}
