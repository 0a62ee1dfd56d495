//! Merges runs of adjacent top-level definition lists into one.

use crate::mdast::Node;

use super::{Pass, PassContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct Coalescer;

impl Pass for Coalescer {
    fn name(&self) -> &'static str {
        "coalescer"
    }

    fn description(&self) -> &'static str {
        "Joins adjacent top-level definition lists into a single list"
    }

    fn apply(&self, tree: &mut Node, _ctx: &PassContext) {
        let Node::Root(root) = tree else {
            return;
        };

        let mut out = Vec::with_capacity(root.children.len());
        let mut pending: Vec<Node> = Vec::new();
        for child in std::mem::take(&mut root.children) {
            match child {
                Node::DescriptionList(list) => pending.extend(list.children),
                other => {
                    flush(&mut pending, &mut out);
                    out.push(other);
                }
            }
        }
        flush(&mut pending, &mut out);
        root.children = out;
    }
}

/// Emit the collected terms and details as one list. Nothing is emitted for an empty run.
fn flush(pending: &mut Vec<Node>, out: &mut Vec<Node>) {
    if !pending.is_empty() {
        out.push(Node::description_list(std::mem::take(pending)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::Parent;
    use pretty_assertions::assert_eq;

    fn run(mut tree: Node) -> Node {
        Coalescer.apply(&mut tree, &PassContext::default());
        tree
    }

    fn term(text: &str) -> Node {
        Node::DescriptionTerm(Parent::hinted(vec![Node::text(text)], "dt"))
    }

    fn details(text: &str) -> Node {
        Node::description_details(vec![Node::paragraph(vec![Node::text(text)])])
    }

    #[test]
    fn test_adjacent_lists_are_joined() {
        let tree = run(Node::root(vec![
            Node::description_list(vec![term("A"), details("a")]),
            Node::description_list(vec![term("B"), details("b")]),
            Node::paragraph(vec![Node::text("between")]),
            Node::description_list(vec![term("C"), details("c")]),
        ]));
        assert_eq!(
            tree,
            Node::root(vec![
                Node::description_list(vec![term("A"), details("a"), term("B"), details("b")]),
                Node::paragraph(vec![Node::text("between")]),
                Node::description_list(vec![term("C"), details("c")]),
            ])
        );
    }

    #[test]
    fn test_empty_lists_disappear() {
        let tree = run(Node::root(vec![
            Node::description_list(Vec::new()),
            Node::paragraph(vec![Node::text("text")]),
        ]));
        assert_eq!(tree, Node::root(vec![Node::paragraph(vec![Node::text("text")])]));
    }

    #[test]
    fn test_nested_lists_are_left_alone() {
        let nested = Node::Blockquote(Parent::new(vec![
            Node::description_list(vec![term("A"), details("a")]),
            Node::description_list(vec![term("B"), details("b")]),
        ]));
        let input = Node::root(vec![nested]);
        assert_eq!(run(input.clone()), input);
    }
}
