//! Removes artifacts the earlier stages leave in definition lists.
//!
//! - A trailing `: - ...` fragment at the end of an item's text line is cut off.
//! - When the pre-normalizer duplicated a marker line, the duplicate is the first item
//!   of the list that opens the details node; that item is removed.
//! - List items without children are removed anywhere in the tree.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::mdast::{List, Node, Step, kind, visit_mut};

use super::{Pass, PassContext};

/// `: -`, `: +` or `: *` and the rest of the line, up to the next colon
static TRAILING_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m): [-*+][^:\n]*$").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct Cleanup;

impl Pass for Cleanup {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    fn description(&self) -> &'static str {
        "Cuts trailing `: -` fragments, drops duplicated seed items and empty list items"
    }

    fn apply(&self, tree: &mut Node, ctx: &PassContext) {
        visit_mut(tree, &mut |index, siblings| {
            if siblings.parent_kind() != kind::DESCRIPTION_DETAILS {
                return Step::Continue;
            }
            let opens_details = matches!(siblings.get(0), Some(Node::List(_)));
            if let Some(Node::List(list)) = siblings.get_mut(index) {
                strip_fragments(list);
                if ctx.prenormalized && opens_details && !list.children.is_empty() {
                    log::trace!("Removing duplicated seed item");
                    list.children.remove(0);
                }
            }
            Step::Continue
        });

        let removed = remove_empty_items(tree);
        if removed > 0 {
            log::debug!("Removed {removed} empty list items");
        }
    }
}

fn strip_fragments(list: &mut List) {
    for child in &mut list.children {
        let Node::ListItem(item) = child else {
            continue;
        };
        let Some(text) = item.first_text_mut() else {
            continue;
        };
        let cleaned = match TRAILING_FRAGMENT.replace_all(text, "") {
            Cow::Owned(cleaned) => Some(cleaned),
            Cow::Borrowed(_) => None,
        };
        if let Some(cleaned) = cleaned {
            *text = cleaned;
        }
    }
}

/// Remove childless list items in place, deepest first. Returns how many were removed.
fn remove_empty_items(node: &mut Node) -> usize {
    let Some(children) = node.children_mut() else {
        return 0;
    };
    let nested: usize = children.iter_mut().map(remove_empty_items).sum();
    let before = children.len();
    children.retain(|child| !matches!(child, Node::ListItem(item) if item.children.is_empty()));
    nested + before - children.len()
}
