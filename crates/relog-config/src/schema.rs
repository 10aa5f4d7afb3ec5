//! Configuration schema.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path filters restricting the log query.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Split additional headers found in commit bodies into sub-commits.
    #[serde(default)]
    pub multiline_commit: bool,

    /// Compare group titles and filter values case-insensitively.
    #[serde(default)]
    pub case_insensitive: bool,

    /// Header pattern configuration.
    #[serde(default = "PatternConfig::header")]
    pub header: PatternConfig,

    /// Merge pattern configuration.
    #[serde(default = "PatternConfig::merge")]
    pub merge: PatternConfig,

    /// Revert pattern configuration.
    #[serde(default = "PatternConfig::revert")]
    pub revert: PatternConfig,

    /// Issue reference configuration.
    #[serde(default)]
    pub refs: RefsConfig,

    /// Note configuration.
    #[serde(default)]
    pub notes: NotesConfig,

    /// Commit filtering and sorting.
    #[serde(default)]
    pub commits: CommitsConfig,

    /// Commit grouping.
    #[serde(default)]
    pub commit_groups: CommitGroupsConfig,

    /// Issue tracker options.
    #[serde(default)]
    pub jira: JiraConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            multiline_commit: false,
            case_insensitive: false,
            header: PatternConfig::header(),
            merge: PatternConfig::merge(),
            revert: PatternConfig::revert(),
            refs: RefsConfig::default(),
            notes: NotesConfig::default(),
            commits: CommitsConfig::default(),
            commit_groups: CommitGroupsConfig::default(),
            jira: JiraConfig::default(),
        }
    }
}

/// A header-matching regex and the field names bound to its capture groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// The regex; no classification happens when unset.
    pub pattern: Option<String>,

    /// Field names in capture-group order.
    #[serde(default)]
    pub pattern_maps: Vec<String>,
}

impl PatternConfig {
    /// Creates a pattern configuration.
    pub fn new(pattern: impl Into<String>, maps: &[&str]) -> Self {
        Self {
            pattern: Some(pattern.into()),
            pattern_maps: maps.iter().map(ToString::to_string).collect(),
        }
    }

    /// Conventional-commit header (`type(scope): subject`).
    pub fn header() -> Self {
        Self::new(
            r"^(\w*)(?:\(([\w\$\.\-\*\s]*)\))?\:\s(.*)$",
            &["Type", "Scope", "Subject"],
        )
    }

    /// Pull-request merge header.
    pub fn merge() -> Self {
        Self::new(r"^Merge pull request #(\d+) from (.*)$", &["Ref", "Source"])
    }

    /// Revert header.
    pub fn revert() -> Self {
        Self::new(r#"^Revert "([\s\S]*)"$"#, &["Header"])
    }
}

/// Issue reference options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefsConfig {
    /// Action keywords preceding a reference (e.g. `Closes`).
    #[serde(default)]
    pub actions: Vec<String>,

    /// Prefixes introducing an issue number (e.g. `#`).
    #[serde(default = "default_issue_prefix")]
    pub issue_prefix: Vec<String>,
}

impl Default for RefsConfig {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            issue_prefix: default_issue_prefix(),
        }
    }
}

fn default_issue_prefix() -> Vec<String> {
    vec!["#".to_string()]
}

/// Note options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Keywords opening a note (e.g. `BREAKING CHANGE`).
    #[serde(default = "default_note_keywords")]
    pub keywords: Vec<String>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            keywords: default_note_keywords(),
        }
    }
}

fn default_note_keywords() -> Vec<String> {
    vec!["BREAKING CHANGE".to_string()]
}

/// Commit filtering and sorting options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitsConfig {
    /// Field path used to sort commits within a group.
    #[serde(default = "default_commit_sort_by")]
    pub sort_by: String,

    /// Field path to allowed values; all entries must match.
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            sort_by: default_commit_sort_by(),
            filters: BTreeMap::new(),
        }
    }
}

fn default_commit_sort_by() -> String {
    "Scope".to_string()
}

/// How commit groups are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupSortBy {
    /// Follow `commit_groups.title_order`.
    Custom,
    /// Ascending by a group field path.
    Field(String),
}

impl From<String> for GroupSortBy {
    fn from(value: String) -> Self {
        if value == "Custom" {
            Self::Custom
        } else {
            Self::Field(value)
        }
    }
}

impl From<GroupSortBy> for String {
    fn from(value: GroupSortBy) -> Self {
        match value {
            GroupSortBy::Custom => "Custom".to_string(),
            GroupSortBy::Field(path) => path,
        }
    }
}

/// Commit grouping options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitGroupsConfig {
    /// Field path whose value names a commit's group.
    #[serde(default = "default_group_by")]
    pub group_by: String,

    /// Group ordering.
    #[serde(default = "default_group_sort_by")]
    pub sort_by: GroupSortBy,

    /// Raw titles in display order, used with `sort_by = "Custom"`.
    #[serde(default)]
    pub title_order: Vec<String>,

    /// Display titles by raw title.
    #[serde(default)]
    pub title_maps: HashMap<String, String>,
}

impl Default for CommitGroupsConfig {
    fn default() -> Self {
        Self {
            group_by: default_group_by(),
            sort_by: default_group_sort_by(),
            title_order: Vec::new(),
            title_maps: HashMap::new(),
        }
    }
}

fn default_group_by() -> String {
    "Type".to_string()
}

fn default_group_sort_by() -> GroupSortBy {
    GroupSortBy::Field("Title".to_string())
}

/// Issue tracker options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Commit type by issue type.
    #[serde(default)]
    pub type_maps: HashMap<String, String>,

    /// Regex whose first capture group narrows the issue description.
    pub issue_description_pattern: Option<String>,
}
