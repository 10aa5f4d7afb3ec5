//! Commit types for Relog.
//!
//! This crate provides the records flowing through the changelog pipeline:
//! - [`Commit`]: A commit parsed from the log, with its extracted metadata
//! - [`CommitGroup`] and [`NoteGroup`]: Groupings built for presentation
//! - [`FieldPath`]: Typed access to record fields by configured name
//! - [`Binding`]: Positional assignment of regex captures to named fields

mod bind;
mod commit;
mod field;
mod group;

pub use bind::{Bindable, Binding, Setter};
pub use commit::{
    Commit, CommitBuilder, Contact, Hash, JiraIssue, Merge, Note, Ref, Revert, Signature,
};
pub use field::{
    CompareError, FieldPath, FieldValue, Fields, Getter, Operator, accessor, compare,
};
pub use group::{CommitGroup, NoteGroup};
