//!
//! Markdown text to [`Node`] tree, on top of pulldown-cmark's event stream.
//!
//! Block nodes keep the byte span they were parsed from so later stages can go back to the
//! exact source of a paragraph. Soft line breaks become `"\n"` inside the surrounding text
//! leaf, which is how definition markers written on their own line (`: Definition`) stay
//! visible in paragraph text.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use std::ops::Range;

use crate::config::MarkdownConfig;
use crate::mdast::{Code, Heading, Image, Link, List, ListItem, Node, Other, Parent, Position, push_child};

/// Markdown dialect switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Strikethrough and task list syntax
    pub gfm: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl From<&MarkdownConfig> for ParseOptions {
    fn from(config: &MarkdownConfig) -> Self {
        Self { gfm: config.gfm }
    }
}

impl ParseOptions {
    fn to_cmark(self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }
}

/// Parse Markdown text into a `root` node.
pub fn parse(source: &str, options: ParseOptions) -> Node {
    let mut stack = vec![Node::Root(Parent {
        position: Some(Position::new(0, source.len())),
        ..Parent::default()
    })];

    for (event, range) in Parser::new_ext(source, options.to_cmark()).into_offset_iter() {
        match event {
            Event::Start(tag) => stack.push(open(tag, range)),
            Event::End(_) => close_top(&mut stack),
            Event::Text(text) => attach(&mut stack, Node::Text(text.into_string())),
            Event::Code(code) => attach(&mut stack, Node::InlineCode(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => attach(&mut stack, Node::Html(html.into_string())),
            Event::SoftBreak => attach(&mut stack, Node::text("\n")),
            Event::HardBreak => attach(&mut stack, Node::Break),
            Event::Rule => attach(&mut stack, Node::ThematicBreak),
            Event::TaskListMarker(checked) => {
                if let Some(Node::ListItem(item)) = stack.last_mut() {
                    item.checked = Some(checked);
                }
            }
            Event::FootnoteReference(label) => attach(&mut stack, opaque("footnoteReference", label.into_string())),
            Event::InlineMath(math) => attach(&mut stack, opaque("inlineMath", math.into_string())),
            Event::DisplayMath(math) => attach(&mut stack, opaque("math", math.into_string())),
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().unwrap_or_else(|| Node::root(Vec::new()))
}

/// Parse a fragment and return its top-level nodes.
pub fn parse_blocks(source: &str, options: ParseOptions) -> Vec<Node> {
    parse(source, options).into_children()
}

fn opaque(kind: &str, value: String) -> Node {
    Node::Other(Other {
        kind: kind.to_string(),
        value: Some(value),
        ..Other::default()
    })
}

fn open(tag: Tag<'_>, range: Range<usize>) -> Node {
    let at = |range: Range<usize>| Parent {
        position: Some(Position::new(range.start, range.end)),
        ..Parent::default()
    };
    match tag {
        Tag::Paragraph => Node::Paragraph(at(range)),
        Tag::Heading { level, .. } => Node::Heading(Heading {
            depth: level as u8,
            children: Vec::new(),
        }),
        Tag::BlockQuote(_) => Node::Blockquote(at(range)),
        Tag::CodeBlock(kind) => Node::Code(Code {
            lang: match kind {
                CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
                CodeBlockKind::Indented => None,
            },
            value: String::new(),
        }),
        Tag::HtmlBlock => Node::Html(String::new()),
        Tag::List(start) => Node::List(List {
            ordered: start.is_some(),
            start,
            ..List::default()
        }),
        Tag::Item => Node::ListItem(ListItem::default()),
        Tag::Emphasis => Node::Emphasis(Parent::default()),
        Tag::Strong => Node::Strong(Parent::default()),
        Tag::Strikethrough => Node::Delete(Parent::default()),
        Tag::Link { dest_url, title, .. } => Node::Link(Link {
            url: dest_url.into_string(),
            title: (!title.is_empty()).then(|| title.into_string()),
            children: Vec::new(),
        }),
        Tag::Image { dest_url, title, .. } => Node::Image(Image {
            url: dest_url.into_string(),
            title: (!title.is_empty()).then(|| title.into_string()),
            alt: String::new(),
        }),
        Tag::FootnoteDefinition(_) => container("footnoteDefinition"),
        Tag::Table(_) => container("table"),
        Tag::TableHead | Tag::TableRow => container("tableRow"),
        Tag::TableCell => container("tableCell"),
        _ => container("unknown"),
    }
}

fn container(kind: &str) -> Node {
    Node::Other(Other {
        kind: kind.to_string(),
        ..Other::default()
    })
}

fn close_top(stack: &mut Vec<Node>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(node) = stack.pop() {
        let node = finish(node);
        attach(stack, node);
    }
}

/// Add a finished node to whatever is open on top of the stack.
///
/// Leaf containers (code, html, image) absorb the text of what is added to them.
fn attach(stack: &mut [Node], child: Node) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    match parent {
        Node::Code(code) => code.value.push_str(&child.to_plain_text()),
        Node::Html(value) => value.push_str(&child.to_plain_text()),
        Node::Image(image) => image.alt.push_str(&child.to_plain_text()),
        other => {
            if let Some(children) = other.children_mut() {
                push_child(children, child);
            }
        }
    }
}

fn finish(node: Node) -> Node {
    match node {
        Node::ListItem(mut item) => {
            // Paragraph tags only appear in loose items; tight ones carry bare inlines.
            item.spread = item.children.iter().any(|c| matches!(c, Node::Paragraph(_)));
            item.children = wrap_inline_runs(std::mem::take(&mut item.children));
            Node::ListItem(item)
        }
        Node::List(mut list) => {
            list.spread = list.children.iter().any(|c| matches!(c, Node::ListItem(item) if item.spread));
            Node::List(list)
        }
        Node::Code(mut code) => {
            if code.value.ends_with('\n') {
                code.value.pop();
            }
            Node::Code(code)
        }
        Node::Html(value) => Node::Html(value.trim_end_matches('\n').to_string()),
        other => other,
    }
}

/// Group consecutive inline nodes into paragraphs, leaving block nodes in place.
///
/// Raw HTML counts as inline here: the parser does not say whether it came from a block.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    let mut run = Vec::new();
    for child in children {
        if child.is_inline() || matches!(child, Node::Html(_)) {
            push_child(&mut run, child);
        } else {
            if !run.is_empty() {
                out.push(Node::paragraph(std::mem::take(&mut run)));
            }
            out.push(child);
        }
    }
    if !run.is_empty() {
        out.push(Node::paragraph(run));
    }
    out
}
