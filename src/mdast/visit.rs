//! Tree traversal.
//!
//! [`walk_mut`] is a plain pre-order walk for edits that stay inside a node.
//! [`visit_mut`] hands the visitor a node's index together with its parent's child
//! array, so passes can restructure siblings; the returned [`Step`] tells the walker
//! where to resume after an edit.

use std::ops::Range;

use super::Node;

/// Where traversal continues after a visitor returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Descend into the current node, then move to the next sibling
    Continue,
    /// Move to the next sibling without descending
    Skip,
    /// Resume at this index in the same parent without descending
    Resume(usize),
}

/// The child array of the parent being visited.
pub struct Siblings<'a> {
    parent_kind: &'a str,
    nodes: &'a mut Vec<Node>,
}

impl Siblings<'_> {
    /// Type tag of the parent that owns these nodes
    pub fn parent_kind(&self) -> &str {
        self.parent_kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Detach one node; later siblings shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.nodes.len()).then(|| self.nodes.remove(index))
    }

    /// Detach a contiguous run of nodes, preserving their order.
    pub fn remove_run(&mut self, range: Range<usize>) -> Vec<Node> {
        let end = range.end.min(self.nodes.len());
        let start = range.start.min(end);
        self.nodes.drain(start..end).collect()
    }
}

/// Pre-order walk over every node, the starting node included.
pub fn walk_mut<F>(node: &mut Node, f: &mut F)
where
    F: FnMut(&mut Node),
{
    f(node);
    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            walk_mut(child, f);
        }
    }
}

/// Read-only pre-order walk.
pub fn walk<'a, F>(node: &'a Node, f: &mut F)
where
    F: FnMut(&'a Node),
{
    f(node);
    for child in node.children().unwrap_or_default() {
        walk(child, f);
    }
}

/// Depth-first, pre-order visit of every node below `tree` with parent context.
///
/// The tree node itself has no parent and is not passed to the visitor.
pub fn visit_mut<F>(tree: &mut Node, visitor: &mut F)
where
    F: FnMut(usize, &mut Siblings<'_>) -> Step,
{
    if let Some((kind, children)) = tree.parts_mut() {
        visit_children(kind, children, visitor);
    }
}

fn visit_children<F>(parent_kind: &str, nodes: &mut Vec<Node>, visitor: &mut F)
where
    F: FnMut(usize, &mut Siblings<'_>) -> Step,
{
    let mut index = 0;
    while index < nodes.len() {
        let step = visitor(
            index,
            &mut Siblings {
                parent_kind,
                nodes: &mut *nodes,
            },
        );
        match step {
            Step::Continue => {
                if let Some((kind, children)) = nodes.get_mut(index).and_then(Node::parts_mut) {
                    visit_children(kind, children, visitor);
                }
                index += 1;
            }
            Step::Skip => index += 1,
            Step::Resume(next) => index = next,
        }
    }
}
