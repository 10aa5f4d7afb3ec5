//! Groupings built by the commit extractor.

use serde::{Deserialize, Serialize};

use crate::commit::{Commit, Note};
use crate::field::{FieldValue, Fields, Getter, accessor};

/// Commits sharing the same group-by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitGroup {
    /// The grouping key, in its original case.
    pub raw_title: String,

    /// The display label.
    pub title: String,

    /// Members in sort order.
    pub commits: Vec<Commit>,
}

impl CommitGroup {
    /// Creates a group holding a single commit.
    #[must_use]
    pub fn new(raw_title: impl Into<String>, title: impl Into<String>, commit: Commit) -> Self {
        Self {
            raw_title: raw_title.into(),
            title: title.into(),
            commits: vec![commit],
        }
    }
}

impl Fields for CommitGroup {
    fn getter(path: &str) -> Option<Getter<Self>> {
        match path {
            "Title" => Some(accessor(|g: &CommitGroup| Some(FieldValue::Str(&g.title)))),
            "RawTitle" => Some(accessor(|g: &CommitGroup| {
                Some(FieldValue::Str(&g.raw_title))
            })),
            _ => None,
        }
    }
}

/// Notes sharing the same title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGroup {
    /// The note keyword, after title mapping.
    pub title: String,

    /// Notes in commit order.
    pub notes: Vec<Note>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldPath;

    #[test]
    fn test_new_group() {
        let commit = Commit::builder("abc").r#type("feat").build();
        let group = CommitGroup::new("feat", "Features", commit.clone());
        assert_eq!(group.raw_title, "feat");
        assert_eq!(group.title, "Features");
        assert_eq!(group.commits, vec![commit]);
    }

    #[test]
    fn test_group_field_paths() {
        let group = CommitGroup::new("fix", "Bug Fixes", Commit::default());
        assert_eq!(
            FieldPath::<CommitGroup>::new("Title").resolve(&group),
            Some(FieldValue::Str("Bug Fixes"))
        );
        assert_eq!(
            FieldPath::<CommitGroup>::new("RawTitle").resolve(&group),
            Some(FieldValue::Str("fix"))
        );
        assert!(
            FieldPath::<CommitGroup>::new("Commits")
                .resolve(&group)
                .is_none()
        );
    }
}
