//! Source rewriting that runs before the base builder.
//!
//! A definition line that opens with a list marker (`: - item A`) only produces a
//! one-item list, and the items written under it end up as a separate list or as lazy
//! paragraph text. The rewrite repeats the marker line's content as an indented list
//! item right below it, so the following items parse into the same list. The extra
//! first item is removed again by [`super::Cleanup`].
//!
//! Plain definition lines (`: Details`) at column zero get a blank line in front of them
//! so they become paragraphs of their own. The exception is a definition line whose
//! previous line is a term written right after another definition: the term and both
//! definitions stay in one paragraph, so the builder still sees the term.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::markers::{Marker, parse_marker};
use crate::mdast::Node;
use crate::parser::{ParseOptions, parse};

/// Name accepted by `disable`
pub const PRENORMALIZER_NAME: &str = "pre-normalizer";

/// Colon prefix removed from a marker line, at most one space or tab after the colon
static DEFINITION_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*:[ \t]?").unwrap());

/// Rewrites source text and re-parses it into the working tree
#[derive(Debug, Clone, Copy, Default)]
pub struct Prenormalizer {
    options: ParseOptions,
}

impl Prenormalizer {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn name(&self) -> &'static str {
        PRENORMALIZER_NAME
    }

    pub fn description(&self) -> &'static str {
        "Duplicates `: - item` lines as indented items and separates `: ` lines from the text above"
    }

    /// Rewrite `source` and replace the root's children with a parse of the result.
    ///
    /// Returns the rewritten text, which is what node positions refer to afterwards.
    /// Returns `None` and leaves the tree alone when there is no root or no source.
    pub fn apply(&self, tree: &mut Node, source: &str) -> Option<String> {
        let Node::Root(root) = tree else {
            return None;
        };
        if source.is_empty() {
            log::debug!("Pre-normalizer skipped: no source text");
            return None;
        }

        let rewritten = prenormalize(source);
        if let Node::Root(parsed) = parse(&rewritten, self.options) {
            root.children = parsed.children;
            root.position = parsed.position;
        }
        Some(rewritten)
    }
}

/// The marker after `:` on a line like `: - item` or `  :1. item`.
fn definition_marker(line: &str) -> Option<Marker> {
    let after_colon = line.trim_start_matches([' ', '\t']).strip_prefix(':')?;
    let rest = after_colon.trim_start_matches([' ', '\t']);
    let found = parse_marker(rest)?;
    rest[..found.len].ends_with([' ', '\t']).then_some(found.marker)
}

/// Rewrite definition lines outside fenced code.
pub fn prenormalize(source: &str) -> String {
    let mut in_fence = false;
    // A plain definition line has been seen since the last blank line
    let mut in_definition = false;
    let mut previous_was_definition = false;
    let mut out: Vec<Cow<'_, str>> = Vec::new();

    for line in source.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            in_definition = false;
            previous_was_definition = false;
            out.push(Cow::Borrowed(line));
            continue;
        }
        if in_fence {
            out.push(Cow::Borrowed(line));
            continue;
        }

        if let Some(marker) = definition_marker(line) {
            let content = DEFINITION_PREFIX.replace(line, "");
            let indent = match marker {
                Marker::Ordinal(_) => "    ",
                Marker::Bullet(_) => "  ",
            };
            out.push(Cow::Borrowed(line));
            out.push(Cow::Owned(format!("{indent}{content}")));
            in_definition = false;
            previous_was_definition = false;
        } else if line.starts_with(": ") {
            if in_definition && !previous_was_definition {
                out.push(Cow::Borrowed(line));
            } else {
                out.push(Cow::Owned(format!("\n{line}")));
            }
            in_definition = true;
            previous_was_definition = true;
        } else {
            if trimmed.is_empty() {
                in_definition = false;
            }
            previous_was_definition = false;
            out.push(Cow::Borrowed(line));
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bullet_marker_line_is_duplicated() {
        assert_eq!(
            prenormalize("Term\n: - item A\n  - item B\n"),
            "Term\n: - item A\n  - item A\n  - item B\n"
        );
    }

    #[test]
    fn test_ordinal_marker_line_gets_deeper_indent() {
        assert_eq!(
            prenormalize("Term\n: 1. item A\n  2. item B\n"),
            "Term\n: 1. item A\n    1. item A\n  2. item B\n"
        );
    }

    #[test]
    fn test_plain_definition_gets_blank_line() {
        assert_eq!(prenormalize("Term\n: Definition\n"), "Term\n\n: Definition\n");
    }

    #[test]
    fn test_term_between_definitions_stays_in_paragraph() {
        assert_eq!(
            prenormalize("Term A\n: Definition A\nTerm B\n: Definition B\n"),
            "Term A\n\n: Definition A\nTerm B\n: Definition B\n"
        );
    }

    #[test]
    fn test_consecutive_definitions_are_separated() {
        assert_eq!(prenormalize("Term\n: first\n: second\n"), "Term\n\n: first\n\n: second\n");
        assert_eq!(
            prenormalize("A\n: a\n\nB\n: b\n"),
            "A\n\n: a\n\nB\n\n: b\n"
        );
    }

    #[test]
    fn test_indented_plain_definition_is_left_alone() {
        assert_eq!(prenormalize("Term\n  : Definition\n"), "Term\n  : Definition\n");
    }

    #[test]
    fn test_fenced_code_is_left_alone() {
        let source = "```\nTerm\n: - item A\n: Definition\n```\n~~~\n: x\n~~~\n";
        assert_eq!(prenormalize(source), source);
    }

    #[test]
    fn test_marker_needs_following_whitespace() {
        assert_eq!(definition_marker(": - item"), Some(Marker::Bullet('-')));
        assert_eq!(definition_marker("  :\t+\titem"), Some(Marker::Bullet('+')));
        assert_eq!(definition_marker(":2. item"), Some(Marker::Ordinal(2)));
        assert_eq!(definition_marker(": -item"), None);
        assert_eq!(definition_marker(": item"), None);
        assert_eq!(definition_marker("- item"), None);
    }

    #[test]
    fn test_apply_replaces_root_children() {
        let source = "Term\n: Definition\n";
        let mut tree = parse(source, ParseOptions::default());
        let rewritten = Prenormalizer::default().apply(&mut tree, source).unwrap();
        assert_eq!(rewritten, "Term\n\n: Definition\n");
        assert_eq!(tree.children().map(<[Node]>::len), Some(2));
    }

    #[test]
    fn test_apply_without_source() {
        let mut tree = Node::root(vec![Node::paragraph(vec![Node::text("kept")])]);
        assert!(Prenormalizer::default().apply(&mut tree, "").is_none());
        assert_eq!(tree.children().map(<[Node]>::len), Some(1));
    }
}
