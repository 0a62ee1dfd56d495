//! Collects list items scattered across a definition's children into real lists.
//!
//! After the base builder, a details node can hold bare `listItem` children, or text
//! leaves that still start with a bullet. A list item whose first paragraph spans
//! several lines can also hide further items written as `- ...` lines. Each run of
//! such children becomes one list; everything else keeps its place and order.

use crate::markers::{MarkerSet, is_ordinal_item, starts_with_marker, strip_markers};
use crate::mdast::{ListItem, Node, Parent, walk_mut};

use super::{Pass, PassContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct DetailMerger;

impl Pass for DetailMerger {
    fn name(&self) -> &'static str {
        "detail-merger"
    }

    fn description(&self) -> &'static str {
        "Groups list items and bullet text inside definition details into lists"
    }

    fn apply(&self, tree: &mut Node, _ctx: &PassContext) {
        walk_mut(tree, &mut |node| {
            if let Node::DescriptionDetails(details) = node {
                merge_details(details);
            }
        });
    }
}

fn is_list_like(node: &Node) -> bool {
    match node {
        Node::ListItem(_) => true,
        Node::Text(value) => starts_with_marker(value, MarkerSet::Bullets),
        _ => false,
    }
}

fn merge_details(details: &mut Parent) {
    if !details.children.iter().any(is_list_like) {
        return;
    }

    let mut merged = Vec::with_capacity(details.children.len());
    let mut items = Vec::new();
    for child in std::mem::take(&mut details.children) {
        match child {
            Node::ListItem(item) => items.extend(split_item(item)),
            Node::Text(value) if starts_with_marker(&value, MarkerSet::Bullets) => {
                items.push(Node::list_item_from_text(strip_markers(&value, MarkerSet::Bullets)));
            }
            other => {
                flush(&mut items, &mut merged);
                merged.push(other);
            }
        }
    }
    flush(&mut items, &mut merged);

    log::trace!("Merged details into {} children", merged.len());
    details.children = merged;
}

fn flush(items: &mut Vec<Node>, out: &mut Vec<Node>) {
    if !items.is_empty() {
        out.push(Node::list(std::mem::take(items)));
    }
}

/// Split a list item whose first text holds further marker lines.
///
/// The first line stays with the original item. Each later line that starts with a
/// bullet, or with an ordinal at column zero, becomes a new item with its bullet
/// removed; other lines continue the item above them.
fn split_item(mut item: ListItem) -> Vec<Node> {
    let mut produced: Vec<Node> = Vec::new();
    if let Some(text) = item.first_text_mut()
        && text.contains('\n')
    {
        let value = std::mem::take(text);
        let mut lines = value.split('\n');
        text.push_str(lines.next().unwrap_or_default());

        for line in lines {
            if starts_with_marker(line, MarkerSet::Bullets) || is_ordinal_item(line) {
                produced.push(Node::list_item_from_text(strip_markers(line, MarkerSet::Bullets)));
                continue;
            }
            let target = match produced.last_mut() {
                Some(Node::ListItem(last)) => last.first_text_mut(),
                _ => Some(&mut *text),
            };
            if let Some(target) = target {
                target.push('\n');
                target.push_str(line);
            }
        }
    }

    let mut out = Vec::with_capacity(produced.len() + 1);
    out.push(Node::ListItem(item));
    out.extend(produced);
    out
}
