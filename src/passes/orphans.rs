//! Folds stray lists and paragraphs after a definition list into a new details node.

use crate::mdast::{Node, Step, visit_mut};

use super::{Pass, PassContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct OrphanAbsorber;

impl Pass for OrphanAbsorber {
    fn name(&self) -> &'static str {
        "orphan-absorber"
    }

    fn description(&self) -> &'static str {
        "Wraps lists and paragraphs following a definition list into a new details node"
    }

    fn advanced_only(&self) -> bool {
        true
    }

    fn apply(&self, tree: &mut Node, _ctx: &PassContext) {
        visit_mut(tree, &mut |index, siblings| {
            if !matches!(siblings.get(index), Some(Node::DescriptionList(_))) {
                return Step::Continue;
            }

            let end = (index + 1..siblings.len())
                .find(|&i| !matches!(siblings.get(i), Some(Node::List(_) | Node::Paragraph(_))))
                .unwrap_or(siblings.len());
            if end == index + 1 {
                return Step::Continue;
            }

            let run = siblings.remove_run(index + 1..end);
            log::trace!("Absorbing {} orphaned nodes into a definition list", run.len());
            if let Some(Node::DescriptionList(list)) = siblings.get_mut(index) {
                list.children.push(Node::description_details(run));
            }
            Step::Continue
        });
    }
}
