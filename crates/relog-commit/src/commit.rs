//! Commit record produced by the commit parser.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bind::{Bindable, Setter};
use crate::field::{FieldValue, Fields, Getter, accessor};

/// Long and abbreviated commit hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash {
    /// The full SHA.
    pub long: String,

    /// The abbreviated SHA.
    pub short: String,
}

/// Author or committer identity with a timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Authored or committed time, normalized to UTC.
    pub date: DateTime<Utc>,
}

/// A name and email taken from a trailer such as `Co-authored-by`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Name as written in the trailer.
    pub name: String,

    /// Email without the angle brackets.
    pub email: String,
}

/// A reference to an issue, optionally qualified by an action keyword and
/// a source (e.g. `Closes owner/repo#12`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    /// Action keyword as written (`Closes`), empty for bare references.
    pub action: String,

    /// Repository qualifier (`owner/repo`), empty when absent.
    pub source: String,

    /// Issue number without its prefix.
    pub r#ref: String,
}

impl Ref {
    /// Creates a bare issue reference.
    #[must_use]
    pub fn issue(r#ref: impl Into<String>) -> Self {
        Self {
            r#ref: r#ref.into(),
            ..Self::default()
        }
    }

    /// Returns true if this reference has neither action nor source.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.action.is_empty() && self.source.is_empty()
    }
}

/// A titled annotation extracted from a commit body (e.g. `BREAKING CHANGE`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// The matched keyword.
    pub title: String,

    /// Text after the keyword plus any continuation lines.
    pub body: String,
}

/// Fields captured by the merge pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// Pull request or branch reference.
    pub r#ref: String,

    /// Branch the merge came from.
    pub source: String,
}

impl Bindable for Merge {
    fn setter(name: &str) -> Option<Setter<Self>> {
        match name {
            "Ref" => Some(|m: &mut Merge, v: String| m.r#ref = v),
            "Source" => Some(|m: &mut Merge, v: String| m.source = v),
            _ => None,
        }
    }
}

/// Fields captured by the revert pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revert {
    /// Header of the reverted commit.
    pub header: String,
}

impl Bindable for Revert {
    fn setter(name: &str) -> Option<Setter<Self>> {
        match name {
            "Header" => Some(|r: &mut Revert, v: String| r.header = v),
            _ => None,
        }
    }
}

/// Issue details fetched from the issue tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraIssue {
    /// Issue type name (`Story`, `Bug`, ...).
    pub r#type: String,

    pub summary: String,

    /// Description, narrowed by the description pattern when one is set.
    pub description: String,

    pub labels: Vec<String>,
}

/// One logical change, parsed from the log output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit hash, used as identity.
    pub hash: Hash,

    /// Who wrote the change.
    pub author: Signature,

    /// Who recorded the change.
    pub committer: Signature,

    /// Set when the header matches the merge pattern.
    pub merge: Option<Merge>,

    /// Set when the header matches the revert pattern.
    pub revert: Option<Revert>,

    /// The raw subject line.
    pub header: String,

    /// The commit type (feat, fix, ...), bound from the header pattern.
    pub r#type: String,

    /// The scope, bound from the header pattern.
    pub scope: String,

    /// The subject without type and scope, bound from the header pattern.
    pub subject: String,

    /// Issue key bound from the header pattern.
    pub jira_issue_id: String,

    /// Tracker details for `jira_issue_id`, when the lookup succeeded.
    pub jira_issue: Option<JiraIssue>,

    /// Values bound under names that have no dedicated field.
    pub fields: BTreeMap<String, String>,

    /// Issue references, deduplicated.
    pub refs: Vec<Ref>,

    /// Notes in body order.
    pub notes: Vec<Note>,

    /// Usernames mentioned with `@`, deduplicated.
    pub mentions: Vec<String>,

    /// `Co-authored-by` trailers.
    pub co_authors: Vec<Contact>,

    /// `Signed-off-by` trailers.
    pub signers: Vec<Contact>,

    /// The raw body.
    pub body: String,

    /// The body without metadata and note lines.
    pub trimmed_body: String,

    /// Paths touched by the commit, as reported by `git diff --name-only`.
    pub changed_files: Vec<String>,

    /// Additional changes squashed into this commit's body.
    pub sub_commits: Vec<Commit>,
}

impl Commit {
    /// Creates a new commit builder.
    #[must_use]
    pub fn builder(hash: impl Into<String>) -> CommitBuilder {
        CommitBuilder::new(hash)
    }

    /// Returns true if the commit is a merge or a revert.
    #[must_use]
    pub fn is_merge_or_revert(&self) -> bool {
        self.merge.is_some() || self.revert.is_some()
    }

    /// Creates an empty commit carrying this commit's identity and changed
    /// files, used for changes squashed into the body.
    #[must_use]
    pub fn child(&self, header: impl Into<String>) -> Self {
        Self {
            hash: self.hash.clone(),
            author: self.author.clone(),
            committer: self.committer.clone(),
            changed_files: self.changed_files.clone(),
            header: header.into(),
            ..Self::default()
        }
    }
}

impl Bindable for Commit {
    fn setter(name: &str) -> Option<Setter<Self>> {
        match name {
            "Type" => Some(|c: &mut Commit, v: String| c.r#type = v),
            "Scope" => Some(|c: &mut Commit, v: String| c.scope = v),
            "Subject" => Some(|c: &mut Commit, v: String| c.subject = v),
            "JiraIssueID" => Some(|c: &mut Commit, v: String| c.jira_issue_id = v),
            _ => None,
        }
    }

    fn bind_custom(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), value);
    }
}

fn signature_getter(path: &str, select: fn(&Commit) -> &Signature) -> Option<Getter<Commit>> {
    match path {
        "Name" => Some(accessor(move |c: &Commit| {
            Some(FieldValue::Str(&select(c).name))
        })),
        "Email" => Some(accessor(move |c: &Commit| {
            Some(FieldValue::Str(&select(c).email))
        })),
        "Date" => Some(accessor(move |c: &Commit| {
            Some(FieldValue::Time(select(c).date))
        })),
        _ => None,
    }
}

impl Fields for Commit {
    fn getter(path: &str) -> Option<Getter<Self>> {
        if let Some(rest) = path.strip_prefix("Author.") {
            return signature_getter(rest, |c| &c.author);
        }
        if let Some(rest) = path.strip_prefix("Committer.") {
            return signature_getter(rest, |c| &c.committer);
        }

        let getter = match path {
            "Hash.Long" => accessor(|c: &Commit| Some(FieldValue::Str(&c.hash.long))),
            "Hash.Short" => accessor(|c: &Commit| Some(FieldValue::Str(&c.hash.short))),
            "Header" => accessor(|c: &Commit| Some(FieldValue::Str(&c.header))),
            "Type" => accessor(|c: &Commit| Some(FieldValue::Str(&c.r#type))),
            "Scope" => accessor(|c: &Commit| Some(FieldValue::Str(&c.scope))),
            "Subject" => accessor(|c: &Commit| Some(FieldValue::Str(&c.subject))),
            "JiraIssueID" => accessor(|c: &Commit| Some(FieldValue::Str(&c.jira_issue_id))),
            "Body" => accessor(|c: &Commit| Some(FieldValue::Str(&c.body))),
            "TrimmedBody" => accessor(|c: &Commit| Some(FieldValue::Str(&c.trimmed_body))),
            "Merge.Ref" => accessor(|c: &Commit| {
                c.merge.as_ref().map(|m| FieldValue::Str(&m.r#ref))
            }),
            "Merge.Source" => accessor(|c: &Commit| {
                c.merge.as_ref().map(|m| FieldValue::Str(&m.source))
            }),
            "Revert.Header" => accessor(|c: &Commit| {
                c.revert.as_ref().map(|r| FieldValue::Str(&r.header))
            }),
            "JiraIssue.Type" => accessor(|c: &Commit| {
                c.jira_issue.as_ref().map(|i| FieldValue::Str(&i.r#type))
            }),
            "JiraIssue.Summary" => accessor(|c: &Commit| {
                c.jira_issue.as_ref().map(|i| FieldValue::Str(&i.summary))
            }),
            "JiraIssue.Description" => accessor(|c: &Commit| {
                c.jira_issue.as_ref().map(|i| FieldValue::Str(&i.description))
            }),
            custom if !custom.is_empty() && !custom.contains('.') => {
                let key = custom.to_string();
                accessor(move |c: &Commit| c.fields.get(&key).map(|v| FieldValue::Str(v)))
            }
            _ => return None,
        };
        Some(getter)
    }
}

/// Builder for [`Commit`].
#[derive(Debug)]
pub struct CommitBuilder {
    commit: Commit,
}

impl CommitBuilder {
    /// Creates a new builder; the short hash is the first 7 characters.
    fn new(hash: impl Into<String>) -> Self {
        let long: String = hash.into();
        let short = long.chars().take(7).collect();
        Self {
            commit: Commit {
                hash: Hash { long, short },
                ..Commit::default()
            },
        }
    }

    /// Sets the header.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.commit.header = header.into();
        self
    }

    /// Sets the type.
    #[must_use]
    pub fn r#type(mut self, r#type: impl Into<String>) -> Self {
        self.commit.r#type = r#type.into();
        self
    }

    /// Sets the scope.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.commit.scope = scope.into();
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.commit.subject = subject.into();
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn author(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        self.commit.author = Signature {
            name: name.into(),
            email: email.into(),
            date,
        };
        self
    }

    /// Marks the commit as a merge.
    #[must_use]
    pub fn merge(mut self, merge: Merge) -> Self {
        self.commit.merge = Some(merge);
        self
    }

    /// Marks the commit as a revert.
    #[must_use]
    pub fn revert(mut self, revert: Revert) -> Self {
        self.commit.revert = Some(revert);
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn note(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.commit.notes.push(Note {
            title: title.into(),
            body: body.into(),
        });
        self
    }

    /// Adds a free-form bound field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.commit.fields.insert(name.into(), value.into());
        self
    }

    /// Adds a squashed sub-commit.
    #[must_use]
    pub fn sub_commit(mut self, commit: Commit) -> Self {
        self.commit.sub_commits.push(commit);
        self
    }

    /// Builds the [`Commit`].
    #[must_use]
    pub fn build(self) -> Commit {
        self.commit
    }
}
