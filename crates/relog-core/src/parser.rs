//! Commit parser.
//!
//! Turns `git log` output into [`Commit`] records: the header is classified
//! against the configured header, merge and revert patterns, and the body is
//! scanned line by line for issue references, mentions, trailers and notes.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use relog_commit::{Bindable, Binding, Commit, Contact, Merge, Note, Ref, Revert, Signature};
use relog_config::{Config, PatternConfig};
use relog_git::GitClient;
use tracing::{debug, info, warn};

use crate::fence::FenceDetector;
use crate::{CommitProcessor, CoreError, CoreResult, IssueTracker};

/// Marks the start of each commit in the log output.
pub const SEPARATOR: &str = "@@__RELOG__@@";

/// Separates the field blocks of one commit.
pub const DELIMITER: &str = "@@__RELOG_DELIMITER__@@";

const HASH_FIELD: &str = "HASH";
const AUTHOR_FIELD: &str = "AUTHOR";
const COMMITTER_FIELD: &str = "COMMITTER";
const SUBJECT_FIELD: &str = "SUBJECT";
const BODY_FIELD: &str = "BODY";

/// The `--pretty` format understood by [`CommitParser::parse_log`].
pub static LOG_FORMAT: LazyLock<String> = LazyLock::new(|| {
    let fields = [
        format!("{HASH_FIELD}:%H\t%h"),
        format!("{AUTHOR_FIELD}:%an\t%ae\t%at"),
        format!("{COMMITTER_FIELD}:%cn\t%ce\t%ct"),
        format!("{SUBJECT_FIELD}:%s"),
        format!("{BODY_FIELD}:%b"),
    ];
    format!("{SEPARATOR}{}", fields.join(DELIMITER))
});

/// A compiled pattern with its capture bindings.
struct Pattern<T> {
    regex: Regex,
    binding: Binding<T>,
}

impl<T: Bindable> Pattern<T> {
    fn compile(name: &'static str, config: &PatternConfig) -> CoreResult<Option<Self>> {
        let Some(pattern) = config.pattern.as_deref() else {
            return Ok(None);
        };
        Ok(Some(Self {
            regex: compile(name, pattern)?,
            binding: Binding::new(&config.pattern_maps),
        }))
    }

    /// Binds the captures of `input` onto `target`; false if it does not match.
    fn bind(&self, target: &mut T, input: &str) -> bool {
        let Some(caps) = self.regex.captures(input) else {
            return false;
        };
        let values = caps.iter().skip(1).map(|m| m.map_or("", |m| m.as_str()));
        self.binding.apply(target, values);
        true
    }

    fn capture(&self, input: &str) -> Option<T>
    where
        T: Default,
    {
        let mut target = T::default();
        self.bind(&mut target, input).then_some(target)
    }
}

fn compile(name: &'static str, pattern: &str) -> CoreResult<Regex> {
    Regex::new(pattern).map_err(|source| CoreError::InvalidPattern { name, source })
}

fn join_escaped(list: &[String]) -> String {
    list.iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|")
}

fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map_or_else(String::new, |m| m.as_str().to_string())
}

/// Parses raw log output into commits.
pub struct CommitParser {
    client: Box<dyn GitClient>,
    tracker: Option<Box<dyn IssueTracker>>,
    processor: Option<Box<dyn CommitProcessor>>,
    header: Option<Pattern<Commit>>,
    merge: Option<Pattern<Merge>>,
    revert: Option<Pattern<Revert>>,
    re_ref: Option<Regex>,
    re_issue: Option<Regex>,
    re_note: Option<Regex>,
    re_mention: Regex,
    re_sign_off: Regex,
    re_co_author: Regex,
    re_issue_description: Option<Regex>,
    jira_type_maps: HashMap<String, String>,
    multiline: bool,
}

impl CommitParser {
    /// Creates a parser reading history through `client`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPattern`] if a configured pattern does not
    /// compile.
    pub fn new(client: Box<dyn GitClient>, config: &Config) -> CoreResult<Self> {
        let actions = join_escaped(&config.refs.actions);
        let prefixes = join_escaped(&config.refs.issue_prefix);
        let keywords = join_escaped(&config.notes.keywords);

        // An empty action list still captures the source of `owner/repo#1`.
        let re_ref = if prefixes.is_empty() {
            None
        } else {
            Some(compile(
                "reference",
                &format!(r"(?i)({actions})\s?([\w/\.\-]+)?(?:{prefixes})(\d+)"),
            )?)
        };
        let re_issue = if prefixes.is_empty() {
            None
        } else {
            Some(compile("issue", &format!(r"(?:{prefixes})(\d+)"))?)
        };
        let re_note = if keywords.is_empty() {
            None
        } else {
            Some(compile("note", &format!(r"^(?i)\s*({keywords})[:\s]+(.*)"))?)
        };
        let re_issue_description = config
            .jira
            .issue_description_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile("issue description", p))
            .transpose()?;

        Ok(Self {
            client,
            tracker: None,
            processor: None,
            header: Pattern::compile("header", &config.header)?,
            merge: Pattern::compile("merge", &config.merge)?,
            revert: Pattern::compile("revert", &config.revert)?,
            re_ref,
            re_issue,
            re_note,
            re_mention: compile("mention", r"@([\w-]+)")?,
            re_sign_off: compile(
                "sign-off",
                r"Signed-off-by:\s+([\p{L}\s\-\[\]]+)\s+<([\w+\-\[\].@]+)>",
            )?,
            re_co_author: compile(
                "co-author",
                r"Co-authored-by:\s+([\p{L}\s\-\[\]]+)\s+<([\w+\-\[\].@]+)>",
            )?,
            re_issue_description,
            jira_type_maps: config.jira.type_maps.clone(),
            multiline: config.multiline_commit,
        })
    }

    /// Enriches commits carrying an issue key through `tracker`.
    #[must_use]
    pub fn with_issue_tracker(mut self, tracker: Box<dyn IssueTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Passes every parsed commit through `processor`.
    #[must_use]
    pub fn with_processor(mut self, processor: Box<dyn CommitProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Reads and parses the history of `revision`, restricted to `paths`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log or a commit's changed files cannot be read.
    pub fn parse(&self, revision: &str, paths: &[String]) -> CoreResult<Vec<Commit>> {
        let out = self.client.log(revision, &LOG_FORMAT, paths)?;
        self.parse_log(&out)
    }

    /// Parses log output rendered with [`LOG_FORMAT`].
    ///
    /// # Errors
    ///
    /// Returns an error if a commit's changed files cannot be read.
    pub fn parse_log(&self, out: &str) -> CoreResult<Vec<Commit>> {
        let mut commits = Vec::new();

        for record in out.split(SEPARATOR).skip(1) {
            let commit = self.parse_commit(record)?;

            let Some(processor) = &self.processor else {
                commits.push(commit);
                continue;
            };
            let hash = commit.hash.short.clone();
            match processor.process(commit) {
                Some(commit) => commits.push(commit),
                None => debug!(%hash, "commit dropped by processor"),
            }
        }

        info!(count = commits.len(), "parsed commits");
        Ok(commits)
    }

    fn parse_commit(&self, record: &str) -> CoreResult<Commit> {
        let mut commit = Commit::default();

        for token in record.split(DELIMITER) {
            let Some((field, value)) = token.split_once(':') else {
                debug!(token, "skipping field block without a name");
                continue;
            };
            let value = value.trim();

            match field {
                HASH_FIELD => {
                    let mut parts = value.split('\t');
                    commit.hash.long = parts.next().unwrap_or_default().to_string();
                    commit.hash.short = parts.next().unwrap_or_default().to_string();
                }
                AUTHOR_FIELD => commit.author = parse_signature(value),
                COMMITTER_FIELD => commit.committer = parse_signature(value),
                SUBJECT_FIELD => self.process_header(&mut commit, value),
                BODY_FIELD => self.process_body(&mut commit, value),
                other => debug!(field = other, "skipping unknown field block"),
            }
        }

        commit.refs = uniq_refs(std::mem::take(&mut commit.refs));
        commit.mentions = uniq_mentions(std::mem::take(&mut commit.mentions));

        let files = self.client.diff_name_only(&commit.hash.short)?;
        commit.changed_files = files
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        for sub in &mut commit.sub_commits {
            sub.changed_files.clone_from(&commit.changed_files);
        }

        Ok(commit)
    }

    fn process_header(&self, commit: &mut Commit, input: &str) {
        commit.header = input.to_string();

        if let Some(header) = &self.header {
            header.bind(commit, input);
        }
        commit.merge = self.merge.as_ref().and_then(|p| p.capture(input));
        commit.revert = self.revert.as_ref().and_then(|p| p.capture(input));

        commit.refs = self.parse_refs(input);
        commit.mentions = self.parse_mentions(input);

        if !commit.jira_issue_id.is_empty() {
            self.process_jira_issue(commit);
        }
    }

    fn process_body(&self, commit: &mut Commit, input: &str) {
        let input = input.replace("\r\n", "\n").replace('\r', "\n");

        if self.multiline {
            self.split_sub_commits(commit, &input);
        }

        commit.notes = Vec::new();
        let mut in_note = false;
        let mut trim = false;
        let mut fence = FenceDetector::default();
        let mut trimmed = Vec::new();

        for line in input.split('\n') {
            if !in_note {
                trim = false;
            }
            fence.update(line);

            if !fence.in_code_block() && self.extract_line_metadata(commit, line) {
                trim = true;
                in_note = false;
            }

            if let Some(note) = self.parse_note(line) {
                in_note = true;
                trim = true;
                commit.notes.push(note);
            } else if in_note && let Some(last) = commit.notes.last_mut() {
                last.body.push('\n');
                last.body.push_str(line);
            }

            if !trim {
                trimmed.push(line);
            }
        }

        commit.trimmed_body = trimmed.join("\n").trim().to_string();
        commit.body = input;
        for note in &mut commit.notes {
            note.body = note.body.trim().to_string();
        }
    }

    /// Splits body lines matching the header pattern into sub-commits.
    fn split_sub_commits(&self, commit: &mut Commit, body: &str) {
        let Some(header) = &self.header else {
            return;
        };

        for line in body.split('\n') {
            if self.parse_note(line).is_some() {
                continue;
            }

            let mut sub = commit.child(line);
            if !header.bind(&mut sub, line) {
                continue;
            }
            sub.refs = uniq_refs(self.parse_refs(line));
            sub.mentions = uniq_mentions(self.parse_mentions(line));

            if !sub.jira_issue_id.is_empty() {
                self.process_jira_issue(&mut sub);
            }
            commit.sub_commits.push(sub);
        }
    }

    /// Collects references, mentions and trailers from one body line.
    ///
    /// Returns true if anything was found.
    fn extract_line_metadata(&self, commit: &mut Commit, line: &str) -> bool {
        let mut meta = false;

        let refs = self.parse_refs(line);
        if !refs.is_empty() {
            meta = true;
            commit.refs.extend(refs);
        }

        let mentions = self.parse_mentions(line);
        if !mentions.is_empty() {
            meta = true;
            commit.mentions.extend(mentions);
        }

        let co_authors = parse_contacts(&self.re_co_author, line);
        if !co_authors.is_empty() {
            meta = true;
            commit.co_authors.extend(co_authors);
        }

        let signers = parse_contacts(&self.re_sign_off, line);
        if !signers.is_empty() {
            meta = true;
            commit.signers.extend(signers);
        }

        meta
    }

    fn parse_note(&self, line: &str) -> Option<Note> {
        let caps = self.re_note.as_ref()?.captures(line)?;
        Some(Note {
            title: group(&caps, 1),
            body: group(&caps, 2),
        })
    }

    fn parse_refs(&self, input: &str) -> Vec<Ref> {
        let mut refs: Vec<Ref> = self
            .re_ref
            .iter()
            .flat_map(|re| re.captures_iter(input))
            .map(|caps| Ref {
                action: group(&caps, 1),
                source: group(&caps, 2),
                r#ref: group(&caps, 3),
            })
            .collect();

        if let Some(re) = &self.re_issue {
            for caps in re.captures_iter(input) {
                let issue = &caps[1];
                if !refs.iter().any(|r| r.r#ref == issue) {
                    refs.push(Ref::issue(issue));
                }
            }
        }

        refs
    }

    fn parse_mentions(&self, input: &str) -> Vec<String> {
        self.re_mention
            .captures_iter(input)
            .map(|caps| group(&caps, 1))
            .collect()
    }

    fn process_jira_issue(&self, commit: &mut Commit) {
        let Some(tracker) = &self.tracker else {
            debug!(issue = %commit.jira_issue_id, "no issue tracker configured");
            return;
        };

        let mut issue = match tracker.issue(&commit.jira_issue_id) {
            Ok(issue) => issue,
            Err(err) => {
                warn!(issue = %commit.jira_issue_id, error = %err, "failed to fetch issue");
                return;
            }
        };

        commit.r#type = self
            .jira_type_maps
            .get(&issue.r#type)
            .cloned()
            .unwrap_or_default();

        let narrowed = self
            .re_issue_description
            .as_ref()
            .and_then(|re| re.captures(&issue.description))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        if let Some(narrowed) = narrowed {
            issue.description = narrowed;
        }

        commit.jira_issue = Some(issue);
    }
}

fn parse_signature(input: &str) -> Signature {
    let mut parts = input.split('\t');
    let name = parts.next().unwrap_or_default().to_string();
    let email = parts.next().unwrap_or_default().to_string();
    let date = parts
        .next()
        .and_then(|ts| ts.trim().parse::<i64>().ok())
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .unwrap_or_default();

    Signature { name, email, date }
}

fn parse_contacts(re: &Regex, input: &str) -> Vec<Contact> {
    re.captures_iter(input)
        .map(|caps| Contact {
            name: group(&caps, 1),
            email: group(&caps, 2),
        })
        .collect()
}

/// Removes duplicate references, then bare references to an issue that an
/// action reference already names.
fn uniq_refs(refs: Vec<Ref>) -> Vec<Ref> {
    let mut unique: Vec<Ref> = Vec::with_capacity(refs.len());
    for r in refs {
        if !unique.contains(&r) {
            unique.push(r);
        }
    }

    let qualified: HashSet<String> = unique
        .iter()
        .filter(|r| !r.is_bare())
        .map(|r| r.r#ref.clone())
        .collect();
    unique.retain(|r| !r.is_bare() || !qualified.contains(&r.r#ref));
    unique
}

fn uniq_mentions(mentions: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(mentions.len());
    for mention in mentions {
        if !unique.contains(&mention) {
            unique.push(mention);
        }
    }
    unique
}
