//! Changelog pipeline execution.

use relog_config::Config;
use relog_git::GitClient;
use tracing::info;

use crate::{Changes, CommitExtractor, CommitParser, CommitProcessor, CoreResult, IssueTracker};

/// Runs the parser and the extractor over a revision range.
pub struct Pipeline {
    parser: CommitParser,
    extractor: CommitExtractor,
    paths: Vec<String>,
}

impl Pipeline {
    /// Creates a new pipeline from its stages.
    #[must_use]
    pub fn new(parser: CommitParser, extractor: CommitExtractor, paths: Vec<String>) -> Self {
        Self {
            parser,
            extractor,
            paths,
        }
    }

    /// Builds both stages from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern does not compile.
    pub fn from_config(client: Box<dyn GitClient>, config: &Config) -> CoreResult<Self> {
        Ok(Self::new(
            CommitParser::new(client, config)?,
            CommitExtractor::new(config),
            config.paths.clone(),
        ))
    }

    /// Attaches an issue tracker to the parser.
    #[must_use]
    pub fn with_issue_tracker(mut self, tracker: Box<dyn IssueTracker>) -> Self {
        self.parser = self.parser.with_issue_tracker(tracker);
        self
    }

    /// Attaches a post-processor to the parser.
    #[must_use]
    pub fn with_processor(mut self, processor: Box<dyn CommitProcessor>) -> Self {
        self.parser = self.parser.with_processor(processor);
        self
    }

    /// Parses `revision` and extracts its changelog structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn run(&self, revision: &str) -> CoreResult<Changes> {
        info!(revision, paths = ?self.paths, "reading history");
        let commits = self.parser.parse(revision, &self.paths)?;

        let changes = self.extractor.extract(&commits);
        info!(
            groups = changes.commit_groups.len(),
            merges = changes.merge_commits.len(),
            reverts = changes.revert_commits.len(),
            notes = changes.note_groups.len(),
            "extracted changes"
        );
        Ok(changes)
    }
}
