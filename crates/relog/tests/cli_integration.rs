//! End-to-end CLI integration tests.
//!
//! These tests verify the complete CLI workflow by:
//! 1. Creating a temporary git repository
//! 2. Running relog commands
//! 3. Verifying the expected outputs

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::Command as BinCommand;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn relog(dir: &Path) -> BinCommand {
    let mut cmd = BinCommand::cargo_bin("relog").expect("relog binary should be built");
    cmd.current_dir(dir);
    cmd
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Creates a temporary git repository with some initial setup.
fn setup_git_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = temp_dir.path();

    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "commit.gpgsign", "false"]);

    temp_dir
}

/// Writes a file and commits it with the given message.
fn git_commit(dir: &Path, file: &str, message: &str) {
    fs::write(dir.join(file), message).expect("failed to write file");
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", message]);
}

/// Creates a git tag.
fn git_tag(dir: &Path, tag: &str) {
    git(dir, &["tag", tag]);
}

fn run_changelog(dir: &Path, args: &[&str]) -> Value {
    let output = relog(dir)
        .arg("changelog")
        .args(args)
        .output()
        .expect("failed to run relog changelog");

    assert!(
        output.status.success(),
        "changelog should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn group_titles(changes: &Value) -> Vec<String> {
    changes["commit_groups"]
        .as_array()
        .expect("commit_groups should be an array")
        .iter()
        .map(|g| g["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_init_creates_config() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    relog(dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("relog.toml"));

    let content = fs::read_to_string(dir.join("relog.toml")).expect("failed to read config");
    assert!(content.contains("[header]"), "config should have header section");
    assert!(
        content.contains("[commit_groups]"),
        "config should have commit_groups section"
    );
}

#[test]
fn test_init_force_overwrites() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    fs::write(dir.join("relog.toml"), "# old config\n").expect("failed to write config");

    relog(dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    relog(dir).args(["init", "--force"]).assert().success();

    let content = fs::read_to_string(dir.join("relog.toml")).expect("failed to read config");
    assert!(!content.contains("# old config"), "config should be overwritten");
}

#[test]
fn test_changelog_groups_history() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    git_commit(dir, "a.txt", "chore: initial commit");
    git_commit(dir, "b.txt", "feat(cli): add new feature\n\nCloses #12");
    git_commit(
        dir,
        "c.txt",
        "fix: resolve critical bug\n\nBREAKING CHANGE: flag removed",
    );

    let changes = run_changelog(dir, &[]);
    assert_eq!(group_titles(&changes), vec!["Chore", "Feat", "Fix"]);

    let feat = &changes["commit_groups"][1]["commits"][0];
    assert_eq!(feat["scope"], "cli");
    assert_eq!(feat["subject"], "add new feature");
    assert_eq!(feat["refs"][0]["ref"], "12");
    assert_eq!(feat["changed_files"][0], "b.txt");
    assert_eq!(feat["author"]["name"], "Test User");

    assert_eq!(changes["note_groups"][0]["title"], "BREAKING CHANGE");
    assert_eq!(changes["note_groups"][0]["notes"][0]["body"], "flag removed");
}

#[test]
fn test_changelog_tag_query() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    git_commit(dir, "a.txt", "chore: initial commit");
    git_tag(dir, "v0.1.0");
    git_commit(dir, "b.txt", "feat: add new feature");
    git_tag(dir, "v0.2.0");
    git_commit(dir, "c.txt", "fix: unreleased fix");

    let changes = run_changelog(dir, &["v0.1.0..v0.2.0"]);
    assert_eq!(group_titles(&changes), vec!["Feat"]);

    let changes = run_changelog(dir, &["v0.2.0.."]);
    assert_eq!(group_titles(&changes), vec!["Fix"]);

    // A single tag covers all history up to it.
    let changes = run_changelog(dir, &["v0.2.0"]);
    assert_eq!(group_titles(&changes), vec!["Chore", "Feat"]);
}

#[test]
fn test_changelog_unknown_tag() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    git_commit(dir, "a.txt", "chore: initial commit");
    git_tag(dir, "v0.1.0");

    relog(dir)
        .args(["changelog", "v9.9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find the tag: v9.9.9"));
}

#[test]
fn test_changelog_without_tags() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    git_commit(dir, "a.txt", "chore: initial commit");

    relog(dir)
        .args(["changelog", "v0.1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("git-tag does not exist"));
}

#[test]
fn test_changelog_uses_config() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    git_commit(dir, "a.txt", "feat: first");
    git_commit(dir, "b.txt", "fix: second");
    git_commit(dir, "c.txt", "docs: third");

    let config = r#"
[commits.filters]
Type = ["feat", "fix"]

[commit_groups]
sort_by = "Custom"
title_order = ["fix", "feat"]

[commit_groups.title_maps]
feat = "Features"
fix = "Bug Fixes"
"#;
    fs::write(dir.join("relog.toml"), config).expect("failed to write config");

    let changes = run_changelog(dir, &[]);
    assert_eq!(group_titles(&changes), vec!["Bug Fixes", "Features"]);
}

#[test]
fn test_changelog_writes_output_file() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    git_commit(dir, "a.txt", "feat: first");

    relog(dir)
        .args(["changelog", "--pretty", "--output", "changes.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(dir.join("changes.json")).expect("failed to read output");
    let changes: Value = serde_json::from_str(&content).expect("output should be JSON");
    assert_eq!(group_titles(&changes), vec!["Feat"]);
}

#[test]
fn test_changelog_invalid_config_pattern() {
    let temp_dir = setup_git_repo();
    let dir = temp_dir.path();

    git_commit(dir, "a.txt", "feat: first");
    fs::write(dir.join("relog.toml"), "[header]\npattern = \"(\"\n").expect("failed to write");

    relog(dir)
        .arg("changelog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid header pattern"));
}

#[test]
fn test_changelog_outside_repository() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    relog(temp_dir.path())
        .arg("changelog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open repository"));
}
