//! Core library for Relog.
//!
//! This crate provides the changelog pipeline: the [`CommitParser`] turning
//! `git log` output into commits, the [`CommitFilter`] and the
//! [`CommitExtractor`] building the grouped [`Changes`] for a renderer.

mod error;
mod extractor;
mod fence;
mod filter;
mod parser;
mod pipeline;
mod processor;
mod tracker;

pub use error::{CoreError, CoreResult};
pub use extractor::{Changes, CommitExtractor};
pub use filter::CommitFilter;
pub use parser::{CommitParser, DELIMITER, LOG_FORMAT, SEPARATOR};
pub use pipeline::Pipeline;
pub use processor::CommitProcessor;
pub use tracker::{IssueTracker, TrackerError};
