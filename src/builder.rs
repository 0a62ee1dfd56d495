//!
//! Base definition list construction.
//!
//! A definition is a line that starts with `:` followed by whitespace. The builder looks at
//! top-level paragraphs and recognizes three shapes:
//!
//! ```text
//! Term              Term              : More details
//! : Details                           (after a paragraph that already
//!                   : Details          became a definition list)
//! ```
//!
//! Inside one paragraph a plain line directly above a definition line starts a new term,
//! any other plain line continues the current definition. Definition text is parsed again
//! as Markdown, so `: - item` yields a real list inside the details node.

use crate::error::Error;
use crate::mdast::{Node, Parent, Position};
use crate::parser::{ParseOptions, parse_blocks};

/// Converts colon syntax in a tree into `descriptionlist` nodes.
///
/// `source` is the text the tree was parsed from; node positions index into it.
pub trait DefinitionListBuilder: Send + Sync {
    fn build(&self, tree: &mut Node, source: &str) -> Result<(), Error>;
}

/// Builder for the `Term` / `: Details` syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonSyntaxBuilder {
    options: ParseOptions,
}

impl ColonSyntaxBuilder {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

/// What the last node emitted at the current level was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Other,
    /// A plain paragraph that can serve as the term of a loose definition
    Term,
    /// A definition list built from the previous paragraph
    List,
}

/// One term with its definitions, still as text
#[derive(Debug, Default, PartialEq)]
struct Entry<'a> {
    term: Vec<&'a str>,
    details: Vec<String>,
}

impl DefinitionListBuilder for ColonSyntaxBuilder {
    fn build(&self, tree: &mut Node, source: &str) -> Result<(), Error> {
        let Node::Root(root) = tree else {
            log::debug!("Definition list builder skipped: tree is a {}", tree.kind());
            return Ok(());
        };

        let mut out: Vec<Node> = Vec::with_capacity(root.children.len());
        let mut last = Last::Other;
        for child in std::mem::take(&mut root.children) {
            let Node::Paragraph(paragraph) = child else {
                out.push(child);
                last = Last::Other;
                continue;
            };

            let text = paragraph_text(&paragraph, source)?;
            let lines: Vec<&str> = text.lines().map(str::trim_start).collect();
            let mut entries = split_entries(&lines);
            let Some(first) = entries.first_mut() else {
                last = if lines.first().is_some_and(|line| is_definition_line(line)) {
                    Last::Other
                } else {
                    Last::Term
                };
                out.push(Node::Paragraph(paragraph));
                continue;
            };

            if !first.term.is_empty() {
                out.push(self.list_from(None, entries));
                last = Last::List;
                continue;
            }

            match (last, out.last_mut()) {
                (Last::List, Some(Node::DescriptionList(list))) => {
                    let details = std::mem::take(&mut first.details);
                    list.children.extend(details.iter().map(|d| self.details_node(d)));
                    list.children.extend(self.entry_nodes(entries.into_iter().skip(1)));
                }
                (Last::Term, Some(Node::Paragraph(_))) => {
                    let term = match out.pop() {
                        Some(Node::Paragraph(term)) => term.children,
                        _ => Vec::new(),
                    };
                    out.push(self.list_from(Some(term), entries));
                }
                _ => {
                    out.push(Node::Paragraph(paragraph));
                    last = Last::Other;
                    continue;
                }
            }
            last = Last::List;
        }

        log::trace!("Definition list builder produced {} top-level nodes", out.len());
        root.children = out;
        Ok(())
    }
}

impl ColonSyntaxBuilder {
    fn list_from(&self, loose_term: Option<Vec<Node>>, entries: Vec<Entry<'_>>) -> Node {
        let mut children = Vec::new();
        let mut entries = entries.into_iter();
        if let Some(term) = loose_term
            && let Some(first) = entries.next()
        {
            children.push(term_node(term));
            children.extend(first.details.iter().map(|d| self.details_node(d)));
        }
        children.extend(self.entry_nodes(entries));
        Node::DescriptionList(Parent::hinted(children, "dl"))
    }

    fn entry_nodes<'a>(&self, entries: impl Iterator<Item = Entry<'a>>) -> Vec<Node> {
        let mut nodes = Vec::new();
        for entry in entries {
            nodes.push(term_node(self.term_inlines(&entry.term.join("\n"))));
            nodes.extend(entry.details.iter().map(|d| self.details_node(d)));
        }
        nodes
    }

    /// Inline content of a term written as plain lines
    fn term_inlines(&self, text: &str) -> Vec<Node> {
        match parse_blocks(text, self.options).into_iter().next() {
            Some(Node::Paragraph(paragraph)) => paragraph.children,
            _ => vec![Node::text(text)],
        }
    }

    fn details_node(&self, text: &str) -> Node {
        Node::DescriptionDetails(Parent::hinted(parse_blocks(text, self.options), "dd"))
    }
}

fn term_node(children: Vec<Node>) -> Node {
    Node::DescriptionTerm(Parent::hinted(children, "dt"))
}

/// Text of a paragraph, taken from the source when the paragraph knows its span.
fn paragraph_text(paragraph: &Parent, source: &str) -> Result<String, Error> {
    match paragraph.position {
        Some(Position { start, end }) => source
            .get(start..end)
            .map(str::to_string)
            .ok_or(Error::SourceRange {
                start,
                end,
                len: source.len(),
            }),
        None => Ok(paragraph.children.iter().map(Node::to_plain_text).collect()),
    }
}

/// The definition text after `:` and its whitespace, if `line` is a definition line.
fn definition_body(line: &str) -> Option<&str> {
    line.strip_prefix(':')
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
}

fn is_definition_line(line: &str) -> bool {
    definition_body(line).is_some()
}

/// Group paragraph lines into entries.
///
/// Lines before the first definition form the first term. An entry with an empty term
/// means the paragraph opened with a definition line.
fn split_entries<'a>(lines: &[&'a str]) -> Vec<Entry<'a>> {
    let mut entries: Vec<Entry<'a>> = Vec::new();
    let mut term: Vec<&'a str> = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if let Some(body) = definition_body(line) {
            match entries.last_mut() {
                Some(entry) if term.is_empty() => entry.details.push(body.to_string()),
                _ => entries.push(Entry {
                    term: std::mem::take(&mut term),
                    details: vec![body.to_string()],
                }),
            }
        } else if entries.is_empty() || lines.get(index + 1).is_some_and(|next| is_definition_line(next)) {
            term.push(line);
        } else if let Some(details) = entries.last_mut().and_then(|entry| entry.details.last_mut()) {
            details.push('\n');
            details.push_str(line);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn build(source: &str) -> Node {
        let mut tree = parse(source, ParseOptions::default());
        ColonSyntaxBuilder::default().build(&mut tree, source).unwrap();
        tree
    }

    fn kinds(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(Node::kind).collect()
    }

    #[test]
    fn test_split_entries() {
        let lines = ["Term", ": first", "continued", "Next", ": second", ": third"];
        let entries = split_entries(&lines);
        assert_eq!(
            entries,
            vec![
                Entry {
                    term: vec!["Term"],
                    details: vec!["first\ncontinued".to_string()],
                },
                Entry {
                    term: vec!["Next"],
                    details: vec!["second".to_string(), "third".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_plain_line_above_definition_is_a_term() {
        let entries = split_entries(&[": first", "Term B", ": second"]);
        assert_eq!(
            entries,
            vec![
                Entry {
                    term: Vec::new(),
                    details: vec!["first".to_string()],
                },
                Entry {
                    term: vec!["Term B"],
                    details: vec!["second".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_loose_term_with_term_between_definitions() {
        let tree = build("Term A\n\n: Definition A\nTerm B\n: Definition B\n");
        let Node::Root(root) = &tree else { panic!("expected root") };
        assert_eq!(kinds(&root.children), vec!["descriptionlist"]);
        let children = root.children[0].children().unwrap();
        assert_eq!(
            kinds(children),
            vec!["descriptionterm", "descriptiondetails", "descriptionterm", "descriptiondetails"]
        );
        let text: Vec<String> = children.iter().map(Node::to_plain_text).collect();
        assert_eq!(text, vec!["Term A", "Definition A", "Term B", "Definition B"]);
    }

    #[test]
    fn test_no_definition_lines() {
        assert!(split_entries(&["Just", "text"]).is_empty());
        assert!(split_entries(&[":not a definition"]).is_empty());
    }

    #[test]
    fn test_inline_definition() {
        let tree = build("Term\n: Definition\n");
        let Node::Root(root) = &tree else { panic!("expected root") };
        let Node::DescriptionList(list) = &root.children[0] else {
            panic!("expected descriptionlist, got {}", root.children[0].kind());
        };
        assert_eq!(list.data.h_name.as_deref(), Some("dl"));
        assert_eq!(kinds(&list.children), vec!["descriptionterm", "descriptiondetails"]);
        assert_eq!(list.children[0].to_plain_text(), "Term");
        assert_eq!(list.children[1].to_plain_text(), "Definition");
    }

    #[test]
    fn test_loose_definition_uses_previous_paragraph() {
        let tree = build("**Term**\n\n: Definition\n\n: Another\n");
        let Node::Root(root) = &tree else { panic!("expected root") };
        assert_eq!(kinds(&root.children), vec!["descriptionlist"]);
        let children = root.children[0].children().unwrap();
        assert_eq!(
            kinds(children),
            vec!["descriptionterm", "descriptiondetails", "descriptiondetails"]
        );
        assert_eq!(children[0].children().unwrap()[0].kind(), "strong");
    }

    #[test]
    fn test_definition_marker_list_becomes_list() {
        let tree = build("Term\n: - item A\n");
        let Node::Root(root) = &tree else { panic!("expected root") };
        let details = &root.children[0].children().unwrap()[1];
        let Node::List(list) = &details.children().unwrap()[0] else {
            panic!("expected list inside details");
        };
        assert!(!list.ordered);
        assert_eq!(list.children, vec![Node::list_item_from_text("item A")]);
    }

    #[test]
    fn test_lone_definition_without_term_is_kept() {
        let tree = build("# Heading\n\n: orphan\n");
        let Node::Root(root) = &tree else { panic!("expected root") };
        assert_eq!(kinds(&root.children), vec!["heading", "paragraph"]);
    }

    #[test]
    fn test_compact_terms_in_one_paragraph() {
        let tree = build("Apple\n: Fruit\nCarrot\n: Vegetable\n");
        let Node::Root(root) = &tree else { panic!("expected root") };
        let children = root.children[0].children().unwrap();
        let text: Vec<String> = children.iter().map(Node::to_plain_text).collect();
        assert_eq!(text, vec!["Apple", "Fruit", "Carrot", "Vegetable"]);
    }

    #[test]
    fn test_out_of_range_position_is_an_error() {
        let mut tree = parse("Term\n: Definition\n", ParseOptions::default());
        let err = ColonSyntaxBuilder::default().build(&mut tree, "short").unwrap_err();
        assert!(matches!(err, Error::SourceRange { len: 5, .. }));
    }

    #[test]
    fn test_missing_position_falls_back_to_text() {
        let mut tree = Node::root(vec![Node::paragraph(vec![Node::text("Term\n: Definition")])]);
        ColonSyntaxBuilder::default().build(&mut tree, "").unwrap();
        assert_eq!(tree.children().unwrap()[0].kind(), "descriptionlist");
    }

    #[test]
    fn test_non_root_tree_is_untouched() {
        let mut tree = Node::paragraph(vec![Node::text("Term\n: Definition")]);
        let before = tree.clone();
        ColonSyntaxBuilder::default().build(&mut tree, "").unwrap();
        assert_eq!(tree, before);
    }
}
