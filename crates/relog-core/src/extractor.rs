//! Commit extraction: grouping and ordering for presentation.

use std::collections::HashMap;

use relog_commit::{Commit, CommitGroup, FieldPath, Note, NoteGroup};
use relog_config::{Config, GroupSortBy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CommitFilter;

/// The structure handed to a changelog renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    /// Ordinary commits grouped by the configured field.
    pub commit_groups: Vec<CommitGroup>,

    /// Commits whose header matched the merge pattern.
    pub merge_commits: Vec<Commit>,

    /// Commits whose header matched the revert pattern.
    pub revert_commits: Vec<Commit>,

    /// Notes from every kept commit, grouped by title.
    pub note_groups: Vec<NoteGroup>,
}

enum GroupOrder {
    /// Index in the configured title order; absent titles rank as 0.
    Custom(HashMap<String, usize>),
    Field(FieldPath<CommitGroup>),
}

/// Splits commits into merges, reverts, commit groups and note groups.
pub struct CommitExtractor {
    filter: CommitFilter,
    group_by: FieldPath<Commit>,
    group_order: GroupOrder,
    title_maps: HashMap<String, String>,
    sort_by: FieldPath<Commit>,
    case_insensitive: bool,
}

impl CommitExtractor {
    /// Creates an extractor from the configuration.
    pub fn new(config: &Config) -> Self {
        let groups = &config.commit_groups;
        let group_order = match &groups.sort_by {
            GroupSortBy::Custom => GroupOrder::Custom(
                groups
                    .title_order
                    .iter()
                    .enumerate()
                    .map(|(i, title)| (title.clone(), i))
                    .collect(),
            ),
            GroupSortBy::Field(path) => GroupOrder::Field(FieldPath::new(path.as_str())),
        };

        Self {
            filter: CommitFilter::new(&config.commits.filters, config.case_insensitive),
            group_by: FieldPath::new(groups.group_by.as_str()),
            group_order,
            title_maps: groups.title_maps.clone(),
            sort_by: FieldPath::new(config.commits.sort_by.as_str()),
            case_insensitive: config.case_insensitive,
        }
    }

    /// Extracts the changelog structure from parsed commits.
    pub fn extract(&self, commits: &[Commit]) -> Changes {
        let mut changes = Changes::default();

        for commit in commits {
            if commit.merge.is_some() {
                changes.merge_commits.push(commit.clone());
            } else if commit.revert.is_some() {
                changes.revert_commits.push(commit.clone());
            }
        }

        let filtered = self.filter.filter(commits);
        debug!(
            total = commits.len(),
            kept = filtered.len(),
            "filtered commits"
        );

        for commit in filtered {
            if !commit.is_merge_or_revert() {
                self.add_to_group(&mut changes.commit_groups, commit);
            }
            for note in &commit.notes {
                add_note(&mut changes.note_groups, note);
            }
        }

        self.sort_commit_groups(&mut changes.commit_groups);
        sort_note_groups(&mut changes.note_groups);
        changes
    }

    fn add_to_group(&self, groups: &mut Vec<CommitGroup>, commit: &Commit) {
        let Some(raw) = self.group_by.resolve(commit).and_then(|v| v.as_str()) else {
            return;
        };

        let existing = groups.iter_mut().rev().find(|g| {
            if self.case_insensitive {
                g.raw_title.to_lowercase() == raw.to_lowercase()
            } else {
                g.raw_title == raw
            }
        });

        if let Some(group) = existing {
            group.commits.push(commit.clone());
        } else if !raw.is_empty() {
            let title = self
                .title_maps
                .get(raw)
                .cloned()
                .unwrap_or_else(|| title_case(raw));
            groups.push(CommitGroup::new(raw, title, commit.clone()));
        }
    }

    fn sort_commit_groups(&self, groups: &mut Vec<CommitGroup>) {
        match &self.group_order {
            GroupOrder::Custom(order) => {
                groups.sort_by_key(|g| order.get(&g.raw_title).copied().unwrap_or_default());
            }
            GroupOrder::Field(path) => stable_sort(groups, |a, b| path.less(a, b)),
        }

        for group in groups.iter_mut() {
            stable_sort(&mut group.commits, |a, b| self.sort_by.less(a, b));
        }
    }
}

fn add_note(groups: &mut Vec<NoteGroup>, note: &Note) {
    if let Some(group) = groups.iter_mut().find(|g| g.title == note.title) {
        group.notes.push(note.clone());
    } else {
        groups.push(NoteGroup {
            title: note.title.clone(),
            notes: vec![note.clone()],
        });
    }
}

fn sort_note_groups(groups: &mut [NoteGroup]) {
    groups.sort_by_cached_key(|g| g.title.to_lowercase());
    for group in groups {
        group.notes.sort_by_cached_key(|n| n.title.to_lowercase());
    }
}

/// Stable merge sort driven by a strict "less than" predicate.
///
/// `less` may be partial (unresolved fields are never less); an element only
/// moves ahead of an earlier one when it is strictly less.
fn stable_sort<T>(items: &mut Vec<T>, less: impl Fn(&T, &T) -> bool) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    let mut buf = order.clone();
    merge_sort(&mut order, &mut buf, &|a, b| less(&items[a], &items[b]));

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(order.into_iter().filter_map(|i| slots[i].take()));
}

fn merge_sort(idx: &mut [usize], buf: &mut [usize], less: &dyn Fn(usize, usize) -> bool) {
    let len = idx.len();
    if len < 2 {
        return;
    }

    let mid = len / 2;
    merge_sort(&mut idx[..mid], &mut buf[..mid], less);
    merge_sort(&mut idx[mid..], &mut buf[mid..], less);

    buf.copy_from_slice(idx);
    let (left, right) = buf.split_at(mid);
    let (mut i, mut j) = (0, 0);
    for slot in idx.iter_mut() {
        if j < right.len() && (i >= left.len() || less(right[j], left[i])) {
            *slot = right[j];
            j += 1;
        } else {
            *slot = left[i];
            i += 1;
        }
    }
}

/// Upper-cases the first letter of every word.
///
/// Letters, digits and underscores form words; anything else separates them.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use relog_commit::{Merge, Revert};

    fn commit(hash: &str, r#type: &str, scope: &str) -> Commit {
        Commit::builder(hash).r#type(r#type).scope(scope).build()
    }

    fn titles(changes: &Changes) -> Vec<&str> {
        changes
            .commit_groups
            .iter()
            .map(|g| g.raw_title.as_str())
            .collect()
    }

    fn hashes(commits: &[Commit]) -> Vec<&str> {
        commits.iter().map(|c| c.hash.long.as_str()).collect()
    }

    #[test]
    fn test_custom_group_order() {
        let mut config = Config::default();
        config.commit_groups.sort_by = GroupSortBy::Custom;
        config.commit_groups.title_order = vec!["fix".to_string(), "feat".to_string()];

        let commits = vec![
            commit("1", "feat", ""),
            commit("2", "feat", ""),
            commit("3", "fix", ""),
        ];
        let changes = CommitExtractor::new(&config).extract(&commits);

        assert_eq!(titles(&changes), vec!["fix", "feat"]);
        assert_eq!(hashes(&changes.commit_groups[1].commits), vec!["1", "2"]);
    }

    #[test]
    fn test_custom_order_absent_titles_rank_first() {
        let mut config = Config::default();
        config.commit_groups.sort_by = GroupSortBy::Custom;
        config.commit_groups.title_order =
            vec!["feat".to_string(), "fix".to_string(), "docs".to_string()];

        let commits = vec![
            commit("1", "docs", ""),
            commit("2", "fix", ""),
            commit("3", "chore", ""),
        ];
        let changes = CommitExtractor::new(&config).extract(&commits);
        assert_eq!(titles(&changes), vec!["chore", "fix", "docs"]);
    }

    #[test]
    fn test_default_group_order_by_title() {
        let commits = vec![
            commit("1", "perf", ""),
            commit("2", "feat", ""),
            commit("3", "fix", ""),
        ];
        let changes = CommitExtractor::new(&Config::default()).extract(&commits);
        assert_eq!(titles(&changes), vec!["feat", "fix", "perf"]);
        assert_eq!(changes.commit_groups[0].title, "Feat");
    }

    #[test]
    fn test_title_maps() {
        let mut config = Config::default();
        config
            .commit_groups
            .title_maps
            .insert("feat".to_string(), "Features".to_string());

        let changes =
            CommitExtractor::new(&config).extract(&[commit("1", "feat", ""), commit("2", "fix", "")]);
        assert_eq!(changes.commit_groups[0].title, "Features");
        assert_eq!(changes.commit_groups[1].title, "Fix");
    }

    #[test]
    fn test_case_insensitive_grouping() {
        let mut config = Config::default();
        config.case_insensitive = true;

        let commits = vec![commit("1", "Feat", ""), commit("2", "feat", "")];
        let changes = CommitExtractor::new(&config).extract(&commits);
        assert_eq!(changes.commit_groups.len(), 1);
        assert_eq!(changes.commit_groups[0].raw_title, "Feat");
        assert_eq!(changes.commit_groups[0].commits.len(), 2);

        let changes = CommitExtractor::new(&Config::default()).extract(&commits);
        assert_eq!(changes.commit_groups.len(), 2);
    }

    #[test]
    fn test_empty_group_value_is_ungrouped() {
        let commits = vec![commit("1", "", ""), commit("2", "feat", "")];
        let changes = CommitExtractor::new(&Config::default()).extract(&commits);
        assert_eq!(titles(&changes), vec!["feat"]);
    }

    #[test]
    fn test_commit_sort_is_stable() {
        let commits = vec![
            commit("1", "feat", "ui"),
            commit("2", "feat", "api"),
            commit("3", "feat", "ui"),
            commit("4", "feat", "api"),
            commit("5", "feat", ""),
        ];
        let changes = CommitExtractor::new(&Config::default()).extract(&commits);
        assert_eq!(
            hashes(&changes.commit_groups[0].commits),
            vec!["5", "2", "4", "1", "3"]
        );
    }

    #[test]
    fn test_commit_sort_by_date() {
        let mut config = Config::default();
        config.commits.sort_by = "Author.Date".to_string();

        let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
        let commits = vec![
            Commit::builder("late").r#type("feat").author("a", "a@x", at(30)).build(),
            Commit::builder("early").r#type("feat").author("a", "a@x", at(10)).build(),
        ];
        let changes = CommitExtractor::new(&config).extract(&commits);
        assert_eq!(hashes(&changes.commit_groups[0].commits), vec!["early", "late"]);
    }

    #[test]
    fn test_unresolved_sort_path_keeps_order() {
        let mut config = Config::default();
        config.commits.sort_by = "Merge.Ref".to_string();

        let commits = vec![commit("b", "feat", ""), commit("a", "feat", "")];
        let changes = CommitExtractor::new(&config).extract(&commits);
        assert_eq!(hashes(&changes.commit_groups[0].commits), vec!["b", "a"]);
    }

    #[test]
    fn test_merge_and_revert_lists() {
        let merge = Merge {
            r#ref: "1".to_string(),
            source: "a/b".to_string(),
        };
        let revert = Revert {
            header: "feat: x".to_string(),
        };
        let commits = vec![
            Commit::builder("m").merge(merge.clone()).build(),
            Commit::builder("r").revert(revert.clone()).note("NOTE", "reverted").build(),
            Commit::builder("both").merge(merge).revert(revert).build(),
            commit("f", "feat", ""),
        ];
        let changes = CommitExtractor::new(&Config::default()).extract(&commits);

        assert_eq!(hashes(&changes.merge_commits), vec!["m", "both"]);
        assert_eq!(hashes(&changes.revert_commits), vec!["r"]);
        assert!(changes.merge_commits[1].revert.is_some());
        assert_eq!(titles(&changes), vec!["feat"]);
        assert_eq!(changes.note_groups.len(), 1);
        assert_eq!(changes.note_groups[0].title, "NOTE");
    }

    #[test]
    fn test_note_groups_sorted_case_insensitively() {
        let commits = vec![
            Commit::builder("1")
                .r#type("feat")
                .note("deprecated", "old flag")
                .note("BREAKING CHANGE", "one")
                .build(),
            Commit::builder("2")
                .r#type("fix")
                .note("BREAKING CHANGE", "two")
                .build(),
        ];
        let changes = CommitExtractor::new(&Config::default()).extract(&commits);

        let groups: Vec<&str> = changes.note_groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(groups, vec!["BREAKING CHANGE", "deprecated"]);
        let bodies: Vec<&str> = changes.note_groups[0]
            .notes
            .iter()
            .map(|n| n.body.as_str())
            .collect();
        assert_eq!(bodies, vec!["one", "two"]);
    }

    #[test]
    fn test_filters_apply_to_groups_and_notes() {
        let mut config = Config::default();
        config
            .commits
            .filters
            .insert("Type".to_string(), vec!["feat".to_string()]);

        let commits = vec![
            Commit::builder("1").r#type("feat").build(),
            Commit::builder("2").r#type("fix").note("BREAKING CHANGE", "x").build(),
        ];
        let changes = CommitExtractor::new(&config).extract(&commits);
        assert_eq!(titles(&changes), vec!["feat"]);
        assert!(changes.note_groups.is_empty());
    }

    #[test]
    fn test_sub_commits_are_grouped() {
        let parent = Commit::builder("p")
            .r#type("feat")
            .sub_commit(commit("p", "fix", ""))
            .build();
        let changes = CommitExtractor::new(&Config::default()).extract(&[parent]);
        assert_eq!(titles(&changes), vec!["feat", "fix"]);
    }

    #[test]
    fn test_changes_serialize() {
        let changes = CommitExtractor::new(&Config::default()).extract(&[commit("1", "feat", "")]);
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json["commit_groups"][0]["title"], "Feat");
        assert_eq!(json["merge_commits"], serde_json::json!([]));

        let back: Changes = serde_json::from_value(json).unwrap();
        assert_eq!(back, changes);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("feat"), "Feat");
        assert_eq!(title_case("bug fixes"), "Bug Fixes");
        assert_eq!(title_case("api-v2 docs_x"), "Api-V2 Docs_x");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_stable_sort_partial_less() {
        let mut items = vec![3, 1, 2, 1];
        stable_sort(&mut items, |a, b| a < b);
        assert_eq!(items, vec![1, 1, 2, 3]);

        let mut items = vec![3, 1, 2];
        stable_sort(&mut items, |_, _| false);
        assert_eq!(items, vec![3, 1, 2]);

        let mut items: Vec<(u8, char)> = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        stable_sort(&mut items, |a, b| a.0 < b.0);
        assert_eq!(items, vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_large_group_sorts_by_scope() {
        let count = 20_000;
        let commits: Vec<Commit> = (0..count)
            .rev()
            .map(|i| commit(&format!("{i:05}"), "feat", &format!("scope-{:05}", i / 2)))
            .collect();

        let changes = CommitExtractor::new(&Config::default()).extract(&commits);
        let sorted = &changes.commit_groups[0].commits;
        assert_eq!(sorted.len(), count);
        assert!(sorted.windows(2).all(|w| w[0].scope <= w[1].scope));
        // equal scopes keep input order, which was descending by hash
        assert_eq!(sorted[0].hash.long, "00001");
        assert_eq!(sorted[1].hash.long, "00000");
    }
}
