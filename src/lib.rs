//!
//! Definition list repair for Markdown syntax trees.
//!
//! Markdown written as
//!
//! ```text
//! Term
//! : - item A
//!   - item B
//! ```
//!
//! parses into a definition list whose details hold only part of the intended list, with
//! the remaining items left behind as sibling nodes. This crate builds definition lists
//! from the colon syntax and then runs a fixed sequence of tree passes that put the
//! scattered items back together, decide whether the list is numbered, and merge
//! adjacent definition lists.
//!
//! ```
//! use deflist_lib::{Config, Transformer, to_html};
//!
//! let transformer = Transformer::new(&Config::default()).unwrap();
//! let tree = transformer.process("Term\n: - item A\n  - item B\n").unwrap();
//! assert!(to_html(&tree).contains("<dd>\n<ul>\n<li>item A</li>\n<li>item B</li>\n</ul>\n</dd>"));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod html;
pub mod init;
pub mod markers;
pub mod mdast;
pub mod parallel;
pub mod parser;
pub mod passes;
pub mod pipeline;

pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::html::to_html;
pub use crate::mdast::Node;
pub use crate::parser::{ParseOptions, parse};
pub use crate::pipeline::{Transformer, Variant, deflist_with_lists};

/// Parse and transform Markdown text with the given configuration.
///
/// # Errors
///
/// Returns [`Error::UnknownPass`] when the configuration disables a pass that does not
/// exist, and [`Error::SourceRange`] when a paragraph span falls outside the text the
/// builder receives.
pub fn process(source: &str, config: &Config) -> Result<Node, Error> {
    Transformer::new(config)?.process(source)
}

/// Parse, transform and render Markdown text as HTML.
///
/// # Errors
///
/// Same as [`process`].
pub fn render_html(source: &str, config: &Config) -> Result<String, Error> {
    process(source, config).map(|tree| to_html(&tree))
}
