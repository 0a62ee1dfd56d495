//!
//! HTML output for transformed trees.
//!
//! Tags follow the usual Markdown mapping, and a node's `hName` hint takes precedence,
//! which is how definition list nodes turn into `<dl>`, `<dt>` and `<dd>`. Items of a
//! tight list render their paragraphs without `<p>` wrappers.

use crate::mdast::{Data, List, ListItem, Node};

/// Render a tree as an HTML fragment.
pub fn to_html(tree: &Node) -> String {
    let mut out = String::new();
    render(tree, &mut out, false);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn tag<'a>(data: &'a Data, default: &'a str) -> &'a str {
    data.h_name.as_deref().unwrap_or(default)
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Children in document order: block nodes on their own lines, inline runs joined.
fn render_flow(children: &[Node], out: &mut String, tight: bool) {
    let mut previous_inline = None;
    for child in children {
        let inline = child.is_inline();
        if let Some(was_inline) = previous_inline
            && !(was_inline && inline)
        {
            out.push('\n');
        }
        render(child, out, tight);
        previous_inline = Some(inline);
    }
}

fn render_inlines(children: &[Node], out: &mut String) {
    for child in children {
        render(child, out, false);
    }
}

/// `<tag>` + flow content + `</tag>`, with line breaks around block content.
fn block(out: &mut String, name: &str, children: &[Node], tight: bool) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    let has_blocks = children.iter().any(|c| !c.is_inline());
    if has_blocks {
        out.push('\n');
    }
    render_flow(children, out, tight);
    if has_blocks {
        out.push('\n');
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn inline(out: &mut String, name: &str, children: &[Node]) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    render_inlines(children, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn render(node: &Node, out: &mut String, tight: bool) {
    match node {
        Node::Root(root) => render_flow(&root.children, out, false),
        Node::Paragraph(paragraph) => {
            if tight && paragraph.data.is_empty() {
                render_inlines(&paragraph.children, out);
            } else {
                inline(out, tag(&paragraph.data, "p"), &paragraph.children);
            }
        }
        Node::Heading(heading) => {
            let name = format!("h{}", heading.depth.clamp(1, 6));
            inline(out, &name, &heading.children);
        }
        Node::Blockquote(quote) => block(out, tag(&quote.data, "blockquote"), &quote.children, false),
        Node::List(list) => render_list(list, out),
        Node::ListItem(item) => render_item(item, out, tight),
        Node::Code(code) => {
            out.push_str("<pre><code");
            if let Some(lang) = &code.lang {
                out.push_str(" class=\"language-");
                escape_into(out, lang);
                out.push('"');
            }
            out.push('>');
            escape_into(out, &code.value);
            if !code.value.is_empty() {
                out.push('\n');
            }
            out.push_str("</code></pre>");
        }
        Node::Html(value) => out.push_str(value),
        Node::ThematicBreak => out.push_str("<hr>"),
        Node::DescriptionList(list) => block(out, tag(&list.data, "dl"), &list.children, false),
        Node::DescriptionTerm(term) => block(out, tag(&term.data, "dt"), &term.children, false),
        Node::DescriptionDetails(details) => block(out, tag(&details.data, "dd"), &details.children, false),
        Node::Text(value) => escape_into(out, value),
        Node::Emphasis(parent) => inline(out, tag(&parent.data, "em"), &parent.children),
        Node::Strong(parent) => inline(out, tag(&parent.data, "strong"), &parent.children),
        Node::Delete(parent) => inline(out, tag(&parent.data, "del"), &parent.children),
        Node::InlineCode(value) => {
            out.push_str("<code>");
            escape_into(out, value);
            out.push_str("</code>");
        }
        Node::Link(link) => {
            out.push_str("<a href=\"");
            escape_into(out, &link.url);
            out.push('"');
            if let Some(title) = &link.title {
                out.push_str(" title=\"");
                escape_into(out, title);
                out.push('"');
            }
            out.push('>');
            render_inlines(&link.children, out);
            out.push_str("</a>");
        }
        Node::Image(image) => {
            out.push_str("<img src=\"");
            escape_into(out, &image.url);
            out.push_str("\" alt=\"");
            escape_into(out, &image.alt);
            out.push('"');
            if let Some(title) = &image.title {
                out.push_str(" title=\"");
                escape_into(out, title);
                out.push('"');
            }
            out.push('>');
        }
        Node::Break => out.push_str("<br>\n"),
        Node::Other(other) => match &other.data.h_name {
            Some(name) => block(out, name, &other.children, tight),
            None if other.children.is_empty() => escape_into(out, other.value.as_deref().unwrap_or_default()),
            None => render_flow(&other.children, out, tight),
        },
    }
}

fn render_list(list: &List, out: &mut String) {
    let name = tag(&list.data, if list.ordered { "ol" } else { "ul" });
    out.push('<');
    out.push_str(name);
    if list.ordered
        && let Some(start) = list.start.filter(|&start| start != 1)
    {
        out.push_str(&format!(" start=\"{start}\""));
    }
    out.push_str(">\n");
    for (index, item) in list.children.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        render(item, out, !list.spread);
    }
    out.push_str("\n</");
    out.push_str(name);
    out.push('>');
}

fn render_item(item: &ListItem, out: &mut String, tight: bool) {
    let tight = tight && !item.spread;
    let name = tag(&item.data, "li");
    out.push('<');
    out.push_str(name);
    out.push('>');
    if let Some(checked) = item.checked {
        out.push_str(if checked {
            "<input type=\"checkbox\" checked disabled> "
        } else {
            "<input type=\"checkbox\" disabled> "
        });
    }
    // Tight items whose content is a single run of text stay on one line.
    let single_line = tight && item.children.len() == 1 && matches!(item.children[0], Node::Paragraph(_));
    if !single_line && !item.children.is_empty() {
        out.push('\n');
    }
    render_flow(&item.children, out, tight);
    if !single_line && !item.children.is_empty() {
        out.push('\n');
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{Code, Parent};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_definition_list_tags() {
        let tree = Node::root(vec![Node::description_list(vec![
            Node::DescriptionTerm(Parent::hinted(vec![Node::text("Term")], "dt")),
            Node::description_details(vec![Node::list(vec![
                Node::list_item_from_text("item A"),
                Node::list_item_from_text("item B"),
            ])]),
        ])]);
        assert_eq!(
            to_html(&tree),
            "<dl>\n<dt>Term</dt>\n<dd>\n<ul>\n<li>item A</li>\n<li>item B</li>\n</ul>\n</dd>\n</dl>\n"
        );
    }

    #[test]
    fn test_ordered_start_and_escaping() {
        let tree = Node::root(vec![Node::List(List {
            ordered: true,
            start: Some(3),
            children: vec![Node::list_item_from_text("a < b & c")],
            ..List::default()
        })]);
        assert_eq!(to_html(&tree), "<ol start=\"3\">\n<li>a &lt; b &amp; c</li>\n</ol>\n");
    }

    #[test]
    fn test_loose_items_keep_paragraphs() {
        let tree = Node::List(List {
            spread: true,
            children: vec![Node::ListItem(ListItem {
                spread: true,
                children: vec![Node::paragraph(vec![Node::text("a")])],
                ..ListItem::default()
            })],
            ..List::default()
        });
        assert_eq!(to_html(&tree), "<ul>\n<li>\n<p>a</p>\n</li>\n</ul>\n");
    }

    #[test]
    fn test_code_and_inline() {
        let tree = Node::root(vec![
            Node::Code(Code {
                lang: Some("rust".to_string()),
                value: "let x = 1;".to_string(),
            }),
            Node::paragraph(vec![
                Node::text("see "),
                Node::InlineCode("<x>".to_string()),
                Node::Break,
                Node::Emphasis(Parent::new(vec![Node::text("done")])),
            ]),
        ]);
        assert_eq!(
            to_html(&tree),
            "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n<p>see <code>&lt;x&gt;</code><br>\n<em>done</em></p>\n"
        );
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(to_html(&Node::root(Vec::new())), "");
    }
}
