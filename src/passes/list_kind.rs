//! Decides whether lists inside definitions are numbered and strips leftover markers.
//!
//! Items rebuilt from text can still start with the marker they were written with. A
//! list becomes ordered when it already was, or when any item text starts with an
//! ordinal marker at column zero. Every item then loses its leading markers.

use crate::markers::{MarkerSet, is_ordinal_item, strip_markers};
use crate::mdast::{List, ListItem, Node, Step, kind, visit_mut};

use super::{Pass, PassContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListKindResolver;

impl Pass for ListKindResolver {
    fn name(&self) -> &'static str {
        "list-kind"
    }

    fn description(&self) -> &'static str {
        "Marks lists in definition details as ordered when items are numbered and strips markers"
    }

    fn apply(&self, tree: &mut Node, _ctx: &PassContext) {
        visit_mut(tree, &mut |index, siblings| {
            if siblings.parent_kind() == kind::DESCRIPTION_DETAILS
                && let Some(Node::List(list)) = siblings.get_mut(index)
            {
                resolve(list);
            }
            Step::Continue
        });
    }
}

fn resolve(list: &mut List) {
    let numbered = list.children.iter().any(|child| match child {
        Node::ListItem(item) => item.first_text().is_some_and(is_ordinal_item),
        _ => false,
    });
    if numbered && !list.ordered {
        log::trace!("List with numbered items marked as ordered");
    }
    list.ordered = list.ordered || numbered;

    for child in &mut list.children {
        if let Node::ListItem(item) = child {
            strip_item(item);
        }
    }
}

fn strip_item(item: &mut ListItem) {
    if let Some(text) = item.first_text_mut() {
        let stripped = strip_markers(text, MarkerSet::Any);
        if stripped.len() != text.len() {
            *text = stripped.to_string();
        }
    }
}
