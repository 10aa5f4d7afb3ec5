//! Commit filtering by field predicates.

use std::collections::BTreeMap;

use relog_commit::{Commit, FieldPath};

struct Predicate {
    path: FieldPath<Commit>,
    allowed: Vec<String>,
}

/// Keeps commits whose fields match every configured predicate.
///
/// Each predicate maps a field path to allowed values: a commit passes a
/// predicate if the field equals any of the values, and must pass all of them.
pub struct CommitFilter {
    predicates: Vec<Predicate>,
    case_insensitive: bool,
}

impl CommitFilter {
    /// Builds a filter from `filters` (field path to allowed values).
    pub fn new(filters: &BTreeMap<String, Vec<String>>, case_insensitive: bool) -> Self {
        let predicates = filters
            .iter()
            .map(|(path, values)| Predicate {
                path: FieldPath::new(path.as_str()),
                allowed: if case_insensitive {
                    values.iter().map(|v| v.to_lowercase()).collect()
                } else {
                    values.clone()
                },
            })
            .collect();

        Self {
            predicates,
            case_insensitive,
        }
    }

    /// Expands sub-commits and returns the matching commits in order.
    pub fn filter<'a>(&self, commits: &'a [Commit]) -> Vec<&'a Commit> {
        commits
            .iter()
            .flat_map(|commit| std::iter::once(commit).chain(&commit.sub_commits))
            .filter(|commit| self.matches(commit))
            .collect()
    }

    /// Returns true if `commit` passes every predicate.
    pub fn matches(&self, commit: &Commit) -> bool {
        self.predicates.iter().all(|predicate| {
            let Some(value) = predicate.path.resolve(commit).and_then(|v| v.as_str()) else {
                return false;
            };

            if self.case_insensitive {
                let value = value.to_lowercase();
                predicate.allowed.iter().any(|allowed| *allowed == value)
            } else {
                predicate.allowed.iter().any(|allowed| allowed == value)
            }
        })
    }
}
