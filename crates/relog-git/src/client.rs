//! Log and diff queries.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::{GitError, GitResult};

/// Source of raw commit history.
pub trait GitClient {
    /// Returns the log of `revision` rendered with the pretty `format`,
    /// restricted to `paths` when not empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be produced.
    fn log(&self, revision: &str, format: &str, paths: &[String]) -> GitResult<String>;

    /// Returns the newline-separated paths touched by the commit `hash`.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be diffed.
    fn diff_name_only(&self, hash: &str) -> GitResult<String>;
}

/// [`GitClient`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Creates a client running git inside `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Returns the working directory.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run(&self, args: &[String]) -> GitResult<String> {
        debug!(workdir = ?self.workdir, ?args, "running git");

        let output = Command::new("git")
            .arg("--no-pager")
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitClient for GitCli {
    fn log(&self, revision: &str, format: &str, paths: &[String]) -> GitResult<String> {
        let mut args = vec![
            "log".to_string(),
            revision.to_string(),
            "--no-decorate".to_string(),
            format!("--pretty={format}"),
        ];

        if !paths.is_empty() {
            args.push("--".to_string());
            args.extend(paths.iter().cloned());
        }

        self.run(&args)
    }

    fn diff_name_only(&self, hash: &str) -> GitResult<String> {
        let args = [
            "diff-tree",
            "--no-commit-id",
            "--name-only",
            "-r",
            hash,
        ]
        .map(String::from);

        self.run(&args)
    }
}
