//!
//! Syntax tree model for Markdown documents that carry definition lists.
//!
//! The node vocabulary follows mdast: block nodes (`paragraph`, `list`, `heading`, ...),
//! inline nodes (`text`, `emphasis`, ...) and the three definition list kinds produced by
//! the base builder (`descriptionlist`, `descriptionterm`, `descriptiondetails`).
//! Anything outside this vocabulary is kept as an opaque [`Other`] node so a tree can be
//! read, transformed and written back without losing content.

use serde::Deserialize;

mod repr;
pub mod visit;

pub use visit::{Siblings, Step, visit_mut, walk, walk_mut};

/// Type tags as they appear in serialized trees.
pub mod kind {
    pub const ROOT: &str = "root";
    pub const PARAGRAPH: &str = "paragraph";
    pub const HEADING: &str = "heading";
    pub const BLOCKQUOTE: &str = "blockquote";
    pub const LIST: &str = "list";
    pub const LIST_ITEM: &str = "listItem";
    pub const CODE: &str = "code";
    pub const HTML: &str = "html";
    pub const THEMATIC_BREAK: &str = "thematicBreak";
    pub const DESCRIPTION_LIST: &str = "descriptionlist";
    pub const DESCRIPTION_TERM: &str = "descriptionterm";
    pub const DESCRIPTION_DETAILS: &str = "descriptiondetails";
    pub const TEXT: &str = "text";
    pub const EMPHASIS: &str = "emphasis";
    pub const STRONG: &str = "strong";
    pub const DELETE: &str = "delete";
    pub const INLINE_CODE: &str = "inlineCode";
    pub const LINK: &str = "link";
    pub const IMAGE: &str = "image";
    pub const BREAK: &str = "break";
}

/// Byte span of a node in the text it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Rendering hints. `h_name` selects the output tag for a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Data {
    pub h_name: Option<String>,
}

impl Data {
    pub fn with_h_name(name: &str) -> Self {
        Self {
            h_name: Some(name.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.h_name.is_none()
    }
}

/// A node whose only payload is its children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parent {
    pub children: Vec<Node>,
    pub data: Data,
    pub position: Option<Position>,
}

impl Parent {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    /// Parent tagged with a rendering hint
    pub fn hinted(children: Vec<Node>, h_name: &str) -> Self {
        Self {
            children,
            data: Data::with_h_name(h_name),
            position: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    /// Numbered (`true`) or bulleted (`false`)
    pub ordered: bool,
    pub start: Option<u64>,
    /// Loose (`true`) or tight (`false`) rendering
    pub spread: bool,
    pub children: Vec<Node>,
    pub data: Data,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    pub spread: bool,
    /// Task list state: `None` for plain items
    pub checked: Option<bool>,
    pub children: Vec<Node>,
    pub data: Data,
}

impl ListItem {
    /// The text leaf at `item > paragraph > text`, if the item starts that way.
    pub fn first_text(&self) -> Option<&str> {
        match self.children.first()? {
            Node::Paragraph(paragraph) => match paragraph.children.first()? {
                Node::Text(value) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn first_text_mut(&mut self) -> Option<&mut String> {
        match self.children.first_mut()? {
            Node::Paragraph(paragraph) => match paragraph.children.first_mut()? {
                Node::Text(value) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Heading {
    pub depth: u8,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Code {
    pub lang: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub url: String,
    pub title: Option<String>,
    pub alt: String,
}

/// A node type outside the known vocabulary, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Other {
    pub kind: String,
    pub children: Vec<Node>,
    pub value: Option<String>,
    pub data: Data,
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "repr::RawNode")]
pub enum Node {
    Root(Parent),
    Paragraph(Parent),
    Heading(Heading),
    Blockquote(Parent),
    List(List),
    ListItem(ListItem),
    Code(Code),
    Html(String),
    ThematicBreak,
    DescriptionList(Parent),
    DescriptionTerm(Parent),
    DescriptionDetails(Parent),
    Text(String),
    Emphasis(Parent),
    Strong(Parent),
    Delete(Parent),
    InlineCode(String),
    Link(Link),
    Image(Image),
    Break,
    Other(Other),
}

impl Node {
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(Parent::new(children))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(Parent::new(children))
    }

    /// Tight, unordered list. Ordering is decided later from the item text.
    pub fn list(items: Vec<Node>) -> Self {
        Node::List(List {
            children: items,
            ..List::default()
        })
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem(ListItem {
            children,
            ..ListItem::default()
        })
    }

    /// Tight list item holding a single paragraph of text
    pub fn list_item_from_text(value: impl Into<String>) -> Self {
        Node::list_item(vec![Node::paragraph(vec![Node::text(value)])])
    }

    /// Synthetic `descriptionlist`, rendered as `<dl>`
    pub fn description_list(children: Vec<Node>) -> Self {
        Node::DescriptionList(Parent::hinted(children, "dl"))
    }

    /// Synthetic `descriptiondetails`, rendered as `<dd>`
    pub fn description_details(children: Vec<Node>) -> Self {
        Node::DescriptionDetails(Parent::hinted(children, "dd"))
    }

    /// The mdast type tag of this node.
    pub fn kind(&self) -> &str {
        match self {
            Node::Root(_) => kind::ROOT,
            Node::Paragraph(_) => kind::PARAGRAPH,
            Node::Heading(_) => kind::HEADING,
            Node::Blockquote(_) => kind::BLOCKQUOTE,
            Node::List(_) => kind::LIST,
            Node::ListItem(_) => kind::LIST_ITEM,
            Node::Code(_) => kind::CODE,
            Node::Html(_) => kind::HTML,
            Node::ThematicBreak => kind::THEMATIC_BREAK,
            Node::DescriptionList(_) => kind::DESCRIPTION_LIST,
            Node::DescriptionTerm(_) => kind::DESCRIPTION_TERM,
            Node::DescriptionDetails(_) => kind::DESCRIPTION_DETAILS,
            Node::Text(_) => kind::TEXT,
            Node::Emphasis(_) => kind::EMPHASIS,
            Node::Strong(_) => kind::STRONG,
            Node::Delete(_) => kind::DELETE,
            Node::InlineCode(_) => kind::INLINE_CODE,
            Node::Link(_) => kind::LINK,
            Node::Image(_) => kind::IMAGE,
            Node::Break => kind::BREAK,
            Node::Other(other) => &other.kind,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(p)
            | Node::Paragraph(p)
            | Node::Blockquote(p)
            | Node::DescriptionList(p)
            | Node::DescriptionTerm(p)
            | Node::DescriptionDetails(p)
            | Node::Emphasis(p)
            | Node::Strong(p)
            | Node::Delete(p) => Some(&p.children),
            Node::Heading(heading) => Some(&heading.children),
            Node::List(list) => Some(&list.children),
            Node::ListItem(item) => Some(&item.children),
            Node::Link(link) => Some(&link.children),
            Node::Other(other) => Some(&other.children),
            Node::Code(_)
            | Node::Html(_)
            | Node::ThematicBreak
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Image(_)
            | Node::Break => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.parts_mut().map(|(_, children)| children)
    }

    /// Type tag and children, borrowed together so a walker can hand both to a visitor.
    pub fn parts_mut(&mut self) -> Option<(&str, &mut Vec<Node>)> {
        match self {
            Node::Root(p) => Some((kind::ROOT, &mut p.children)),
            Node::Paragraph(p) => Some((kind::PARAGRAPH, &mut p.children)),
            Node::Blockquote(p) => Some((kind::BLOCKQUOTE, &mut p.children)),
            Node::DescriptionList(p) => Some((kind::DESCRIPTION_LIST, &mut p.children)),
            Node::DescriptionTerm(p) => Some((kind::DESCRIPTION_TERM, &mut p.children)),
            Node::DescriptionDetails(p) => Some((kind::DESCRIPTION_DETAILS, &mut p.children)),
            Node::Emphasis(p) => Some((kind::EMPHASIS, &mut p.children)),
            Node::Strong(p) => Some((kind::STRONG, &mut p.children)),
            Node::Delete(p) => Some((kind::DELETE, &mut p.children)),
            Node::Heading(heading) => Some((kind::HEADING, &mut heading.children)),
            Node::List(list) => Some((kind::LIST, &mut list.children)),
            Node::ListItem(item) => Some((kind::LIST_ITEM, &mut item.children)),
            Node::Link(link) => Some((kind::LINK, &mut link.children)),
            Node::Other(other) => Some((other.kind.as_str(), &mut other.children)),
            Node::Code(_)
            | Node::Html(_)
            | Node::ThematicBreak
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Image(_)
            | Node::Break => None,
        }
    }

    /// Consume the node and return its children (empty for leaves).
    pub fn into_children(self) -> Vec<Node> {
        match self {
            Node::Root(p)
            | Node::Paragraph(p)
            | Node::Blockquote(p)
            | Node::DescriptionList(p)
            | Node::DescriptionTerm(p)
            | Node::DescriptionDetails(p)
            | Node::Emphasis(p)
            | Node::Strong(p)
            | Node::Delete(p) => p.children,
            Node::Heading(heading) => heading.children,
            Node::List(list) => list.children,
            Node::ListItem(item) => item.children,
            Node::Link(link) => link.children,
            Node::Other(other) => other.children,
            Node::Code(_)
            | Node::Html(_)
            | Node::ThematicBreak
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Image(_)
            | Node::Break => Vec::new(),
        }
    }

    pub fn data(&self) -> Option<&Data> {
        match self {
            Node::Root(p)
            | Node::Paragraph(p)
            | Node::Blockquote(p)
            | Node::DescriptionList(p)
            | Node::DescriptionTerm(p)
            | Node::DescriptionDetails(p)
            | Node::Emphasis(p)
            | Node::Strong(p)
            | Node::Delete(p) => Some(&p.data),
            Node::List(list) => Some(&list.data),
            Node::ListItem(item) => Some(&item.data),
            Node::Other(other) => Some(&other.data),
            Node::Heading(_)
            | Node::Code(_)
            | Node::Html(_)
            | Node::ThematicBreak
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Link(_)
            | Node::Image(_)
            | Node::Break => None,
        }
    }

    /// Phrasing content, as opposed to flow (block) content.
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Text(_)
            | Node::Emphasis(_)
            | Node::Strong(_)
            | Node::Delete(_)
            | Node::InlineCode(_)
            | Node::Link(_)
            | Node::Image(_)
            | Node::Break => true,
            Node::Other(other) => other.children.iter().all(Node::is_inline) && other.value.is_some(),
            Node::Root(_)
            | Node::Paragraph(_)
            | Node::Heading(_)
            | Node::Blockquote(_)
            | Node::List(_)
            | Node::ListItem(_)
            | Node::Code(_)
            | Node::Html(_)
            | Node::ThematicBreak
            | Node::DescriptionList(_)
            | Node::DescriptionTerm(_)
            | Node::DescriptionDetails(_) => false,
        }
    }

    /// Concatenated textual content of the subtree.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(value) | Node::InlineCode(value) | Node::Html(value) => out.push_str(value),
        Node::Code(code) => out.push_str(&code.value),
        Node::Image(image) => out.push_str(&image.alt),
        Node::Other(Other {
            value: Some(value), ..
        }) => out.push_str(value),
        _ => {
            for child in node.children().unwrap_or_default() {
                collect_text(child, out);
            }
        }
    }
}

/// Append `child`, merging adjacent text leaves.
pub fn push_child(children: &mut Vec<Node>, child: Node) {
    if let Node::Text(value) = &child
        && let Some(Node::Text(last)) = children.last_mut()
    {
        last.push_str(value);
        return;
    }
    children.push(child);
}
