//! Git repository wrapper.

use std::path::Path;

use git2::Repository as Git2Repo;
use tracing::debug;

use crate::{GitCli, GitError, GitResult};

/// A Git repository wrapper.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Discovers the repository from the given directory or its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner =
            Git2Repo::discover(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Returns the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    /// Returns a command-line client rooted at this repository.
    #[must_use]
    pub fn client(&self) -> GitCli {
        GitCli::new(self.path())
    }

    /// Returns all tags in the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if tags cannot be read.
    pub fn tags(&self) -> GitResult<Vec<String>> {
        let tags = self.inner.tag_names(None)?;
        Ok(tags.iter().flatten().map(String::from).collect())
    }

    /// Turns a tag query into a revision for `git log`.
    ///
    /// Accepted forms are `""` (the whole history), `A..B`, `A..`
    /// (from `A` to `HEAD`), `..B` (up to `B`) and `A`. Every named tag
    /// must exist.
    ///
    /// A single tag `A` resolves like `..A`: every commit reachable from
    /// `A`, not only those since the previous tag. Use `prev..A` to select
    /// one release.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoTags`] if a query names tags in a repository
    /// without any, [`GitError::TagNotFound`] for a missing tag and
    /// [`GitError::InvalidQuery`] for a malformed query.
    pub fn resolve_query(&self, query: &str) -> GitResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Ok("HEAD".to_string());
        }

        let tags = self.tags()?;
        if tags.is_empty() {
            return Err(GitError::NoTags);
        }

        let ensure = |tag: &str| -> GitResult<()> {
            if tags.iter().any(|t| t == tag) {
                Ok(())
            } else {
                Err(GitError::TagNotFound(tag.to_string()))
            }
        };

        let parts: Vec<&str> = query.split("..").collect();
        let revision = match parts.as_slice() {
            [tag] => {
                ensure(tag)?;
                (*tag).to_string()
            }
            ["", ""] => return Err(GitError::InvalidQuery(query.to_string())),
            [from, ""] => {
                ensure(from)?;
                format!("{from}..HEAD")
            }
            ["", to] => {
                ensure(to)?;
                (*to).to_string()
            }
            [from, to] => {
                ensure(from)?;
                ensure(to)?;
                format!("{from}..{to}")
            }
            _ => return Err(GitError::InvalidQuery(query.to_string())),
        };

        debug!(query, %revision, "resolved tag query");
        Ok(revision)
    }
}
