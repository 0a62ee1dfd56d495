//! JSON mapping between [`Node`] and the mdast wire shape.
//!
//! Reading goes through the flat [`RawNode`] record: every mdast node is an object with a
//! `type` tag plus whichever of the optional fields its type uses. Writing is done by hand
//! with a map serializer so only the fields that belong to a type are emitted.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};

use super::{Code, Data, Heading, Image, Link, List, ListItem, Node, Other, Parent, Position, kind};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    children: Vec<Node>,
    value: Option<String>,
    ordered: Option<bool>,
    start: Option<u64>,
    spread: Option<bool>,
    checked: Option<bool>,
    depth: Option<u8>,
    lang: Option<String>,
    url: Option<String>,
    title: Option<String>,
    alt: Option<String>,
    #[serde(deserialize_with = "lenient_data")]
    data: Data,
    #[serde(deserialize_with = "lenient_position")]
    position: Option<Position>,
}

/// Only `hName` is kept from `data`. Any other payload is ignored rather than rejected.
fn lenient_data<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Data, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Data {
        h_name: value.get("hName").and_then(|v| v.as_str()).map(str::to_string),
    })
}

/// mdast positions are `{start: {line, column, offset}, end: {...}}`.
/// Only the offsets are used, and a position without both offsets is dropped.
fn lenient_position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Position>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let offset = |point: &str| {
        value
            .get(point)
            .and_then(|p| p.get("offset"))
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    };
    Ok(offset("start").zip(offset("end")).map(|(start, end)| Position::new(start, end)))
}

impl From<RawNode> for Node {
    fn from(mut raw: RawNode) -> Self {
        let node_kind = std::mem::take(&mut raw.kind);
        let parent = |raw: RawNode| Parent {
            children: raw.children,
            data: raw.data,
            position: raw.position,
        };
        match node_kind.as_str() {
            kind::ROOT => Node::Root(parent(raw)),
            kind::PARAGRAPH => Node::Paragraph(parent(raw)),
            kind::BLOCKQUOTE => Node::Blockquote(parent(raw)),
            kind::DESCRIPTION_LIST => Node::DescriptionList(parent(raw)),
            kind::DESCRIPTION_TERM => Node::DescriptionTerm(parent(raw)),
            kind::DESCRIPTION_DETAILS => Node::DescriptionDetails(parent(raw)),
            kind::EMPHASIS => Node::Emphasis(parent(raw)),
            kind::STRONG => Node::Strong(parent(raw)),
            kind::DELETE => Node::Delete(parent(raw)),
            kind::HEADING => Node::Heading(Heading {
                depth: raw.depth.unwrap_or(1),
                children: raw.children,
            }),
            kind::LIST => Node::List(List {
                ordered: raw.ordered.unwrap_or(false),
                start: raw.start,
                spread: raw.spread.unwrap_or(false),
                children: raw.children,
                data: raw.data,
            }),
            kind::LIST_ITEM => Node::ListItem(ListItem {
                spread: raw.spread.unwrap_or(false),
                checked: raw.checked,
                children: raw.children,
                data: raw.data,
            }),
            kind::CODE => Node::Code(Code {
                lang: raw.lang,
                value: raw.value.unwrap_or_default(),
            }),
            kind::HTML => Node::Html(raw.value.unwrap_or_default()),
            kind::THEMATIC_BREAK => Node::ThematicBreak,
            kind::TEXT => Node::Text(raw.value.unwrap_or_default()),
            kind::INLINE_CODE => Node::InlineCode(raw.value.unwrap_or_default()),
            kind::LINK => Node::Link(Link {
                url: raw.url.unwrap_or_default(),
                title: raw.title,
                children: raw.children,
            }),
            kind::IMAGE => Node::Image(Image {
                url: raw.url.unwrap_or_default(),
                title: raw.title,
                alt: raw.alt.unwrap_or_default(),
            }),
            kind::BREAK => Node::Break,
            _ => Node::Other(Other {
                kind: node_kind.clone(),
                children: raw.children,
                value: raw.value,
                data: raw.data,
            }),
        }
    }
}

struct DataRepr<'a>(&'a Data);

impl Serialize for DataRepr<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(name) = &self.0.h_name {
            map.serialize_entry("hName", name)?;
        }
        map.end()
    }
}

struct PositionRepr(Position);

impl Serialize for PositionRepr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("start", &serde_json::json!({ "offset": self.0.start }))?;
        map.serialize_entry("end", &serde_json::json!({ "offset": self.0.end }))?;
        map.end()
    }
}

fn serialize_parent<M: SerializeMap>(map: &mut M, parent: &Parent) -> Result<(), M::Error> {
    if !parent.data.is_empty() {
        map.serialize_entry("data", &DataRepr(&parent.data))?;
    }
    map.serialize_entry("children", &parent.children)?;
    if let Some(position) = parent.position {
        map.serialize_entry("position", &PositionRepr(position))?;
    }
    Ok(())
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind())?;
        match self {
            Node::Root(p)
            | Node::Paragraph(p)
            | Node::Blockquote(p)
            | Node::DescriptionList(p)
            | Node::DescriptionTerm(p)
            | Node::DescriptionDetails(p)
            | Node::Emphasis(p)
            | Node::Strong(p)
            | Node::Delete(p) => serialize_parent(&mut map, p)?,
            Node::Heading(heading) => {
                map.serialize_entry("depth", &heading.depth)?;
                map.serialize_entry("children", &heading.children)?;
            }
            Node::List(list) => {
                map.serialize_entry("ordered", &list.ordered)?;
                if let Some(start) = list.start {
                    map.serialize_entry("start", &start)?;
                }
                map.serialize_entry("spread", &list.spread)?;
                if !list.data.is_empty() {
                    map.serialize_entry("data", &DataRepr(&list.data))?;
                }
                map.serialize_entry("children", &list.children)?;
            }
            Node::ListItem(item) => {
                map.serialize_entry("spread", &item.spread)?;
                map.serialize_entry("checked", &item.checked)?;
                if !item.data.is_empty() {
                    map.serialize_entry("data", &DataRepr(&item.data))?;
                }
                map.serialize_entry("children", &item.children)?;
            }
            Node::Code(code) => {
                map.serialize_entry("lang", &code.lang)?;
                map.serialize_entry("value", &code.value)?;
            }
            Node::Html(value) | Node::Text(value) | Node::InlineCode(value) => {
                map.serialize_entry("value", value)?;
            }
            Node::Link(link) => {
                map.serialize_entry("url", &link.url)?;
                map.serialize_entry("title", &link.title)?;
                map.serialize_entry("children", &link.children)?;
            }
            Node::Image(image) => {
                map.serialize_entry("url", &image.url)?;
                map.serialize_entry("title", &image.title)?;
                map.serialize_entry("alt", &image.alt)?;
            }
            Node::ThematicBreak | Node::Break => {}
            Node::Other(other) => {
                if let Some(value) = &other.value {
                    map.serialize_entry("value", value)?;
                }
                if !other.data.is_empty() {
                    map.serialize_entry("data", &DataRepr(&other.data))?;
                }
                if !other.children.is_empty() {
                    map.serialize_entry("children", &other.children)?;
                }
            }
        }
        map.end()
    }
}
