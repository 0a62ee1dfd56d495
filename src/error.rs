//!
//! Error types for building and transforming definition lists.
//!
//! The tree passes themselves cannot fail: they only rearrange nodes that are already in
//! memory. Failures come from the edges of the pipeline, where source text, configuration
//! and serialized trees enter.

use std::io;
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::init::InitError;

/// Errors produced while turning input into a transformed tree
#[derive(Error, Debug)]
pub enum Error {
    /// A node's recorded span does not fit the source text it claims to come from
    #[error("Source span {start}..{end} is outside the {len}-byte document or splits a character")]
    SourceRange { start: usize, end: usize, len: usize },

    /// A pass name in `disable` that no pipeline knows about
    #[error("Unknown pass '{0}'. Run `deflist passes` to list available passes")]
    UnknownPass(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read or write a syntax tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
