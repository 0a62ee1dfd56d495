//! Pulls a list that directly follows a definition list into its last details node.
//!
//! Items indented under `: Definition` often parse as a separate top-level list. When a
//! `descriptionlist` ending in a details node is immediately followed by a `list`, that
//! list is moved into the details: its items join the first list already there, or the
//! whole list is appended when there is none.

use crate::mdast::{List, Node, Parent, Step, visit_mut};

use super::{Pass, PassContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct SiblingListAbsorber;

impl Pass for SiblingListAbsorber {
    fn name(&self) -> &'static str {
        "sibling-list"
    }

    fn description(&self) -> &'static str {
        "Moves a list that follows a definition list into its last details node"
    }

    fn apply(&self, tree: &mut Node, _ctx: &PassContext) {
        visit_mut(tree, &mut |index, siblings| {
            let ends_in_details = matches!(
                siblings.get(index),
                Some(Node::DescriptionList(list)) if matches!(list.children.last(), Some(Node::DescriptionDetails(_)))
            );
            if !ends_in_details || !matches!(siblings.get(index + 1), Some(Node::List(_))) {
                return Step::Continue;
            }

            let Some(Node::List(next)) = siblings.remove(index + 1) else {
                return Step::Continue;
            };
            if let Some(Node::DescriptionList(list)) = siblings.get_mut(index)
                && let Some(Node::DescriptionDetails(details)) = list.children.last_mut()
            {
                absorb(details, next);
            }
            Step::Continue
        });
    }
}

fn absorb(details: &mut Parent, list: List) {
    let existing = details.children.iter_mut().find_map(|child| match child {
        Node::List(existing) => Some(existing),
        _ => None,
    });
    match existing {
        Some(existing) => {
            log::trace!("Appending {} sibling items to an existing list", list.children.len());
            existing.children.extend(list.children);
        }
        None => details.children.push(Node::List(list)),
    }
}
