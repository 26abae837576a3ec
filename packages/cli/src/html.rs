//! HTML decoration for rendered trees.
//!
//! Every node becomes a link to its id so a viewer can map clicks back to
//! nodes. Anchors cannot nest, so a child closes its parent's anchor before
//! opening its own and reopens the parent's afterwards. All text from the
//! language, values and template text alike, is escaped on the way in.

use arbor_tree::{NodeId, NodeRef, Wrapper};

pub struct HtmlWrapper {
    selected: Option<NodeId>,
    links: usize,
}

impl HtmlWrapper {
    pub fn new(selected: Option<NodeId>) -> Self {
        Self { selected, links: 0 }
    }

    /// Anchors written so far
    pub fn links(&self) -> usize {
        self.links
    }

    fn open_link(node: &NodeRef<'_>) -> String {
        match &node.descriptor().meta.style {
            Some(style) => format!("<a href=\"#{}\" class=\"{}\">", node.id(), style),
            None => format!("<a href=\"#{}\">", node.id()),
        }
    }

    fn span_class(&self, node: &NodeRef<'_>) -> Option<&'static str> {
        let selected = self.selected?;
        if node.id() == selected {
            return Some("selected");
        }
        let tree = node.tree();
        match (tree.parent(node.id()), tree.parent(selected)) {
            (Some(a), Some(b)) if a == b => Some("sibling"),
            _ => None,
        }
    }
}

impl Wrapper for HtmlWrapper {
    fn wrap(&mut self, node: NodeRef<'_>, text: String) -> String {
        let mut body = text;
        // An empty region cannot be clicked
        if body.is_empty() {
            body.push(' ');
        }

        let (prefix, suffix) = match node.parent() {
            Some(parent) => ("</a>".to_string(), Self::open_link(&parent)),
            None => (String::new(), String::new()),
        };
        let (open_span, close_span) = match self.span_class(&node) {
            Some(class) => (format!("<span class=\"{}\">", class), "</span>"),
            None => (String::new(), ""),
        };

        self.links += 1;
        format!(
            "{}{}{}{}</a>{}{}",
            prefix,
            open_span,
            Self::open_link(&node),
            body,
            close_span,
            suffix
        )
    }

    fn text(&mut self, text: &str) -> String {
        escape_html(text)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            c => output.push(c),
        }
    }
    output
}

/// Standalone page around rendered markup
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body><pre class=\"arbor\">{}</pre></body>\n</html>\n",
        escape_html(title),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_tree::Renderer;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_root_link() {
        let document = arbor_json::parse("[]").unwrap();
        let mut wrapper = HtmlWrapper::new(None);
        let html = Renderer::new(&document.tree).render(document.root, &mut wrapper);

        let root = document.root;
        assert_eq!(html, format!("<a href=\"#{}\" class=\"block\">[]</a>", root));
        assert_eq!(wrapper.links(), 1);
    }

    #[test]
    fn test_child_links_and_selection() {
        let document = arbor_json::parse("[\"\"]").unwrap();
        let item = document.tree.children(document.root)[0];
        let mut wrapper = HtmlWrapper::new(Some(item));
        let html = Renderer::new(&document.tree).render(document.root, &mut wrapper);

        // The child link closes and reopens the parent link
        let child = format!(
            "</a><span class=\"selected\"><a href=\"#{}\" class=\"string\">&quot;&quot;</a></span><a href=\"#{}\" class=\"block\">",
            item, document.root
        );
        assert!(html.contains(&child), "{}", html);
    }

    #[test]
    fn test_template_text_escaped() {
        let language = arbor_tree::Language::from_json(
            r#"{
                "name": "compare",
                "rules": [["Name", "/[a-z&]+/"], ["Less", "left:Name right:Name"]],
                "outputTemplates": { "Less": "{left} < {right}" }
            }"#,
        )
        .unwrap();
        let mut tree = language.new_tree();
        let root = tree
            .graft(&arbor_tree::RawNode::node(
                "Less",
                vec![
                    arbor_tree::RawNode::literal("Name", "a&b"),
                    arbor_tree::RawNode::literal("Name", "c"),
                ],
            ))
            .unwrap();

        let html = Renderer::new(&tree).render(root, &mut HtmlWrapper::new(None));
        assert!(html.contains(">a&amp;b</a>"), "{}", html);
        assert!(html.contains(" &lt; "), "{}", html);
        assert!(!html.contains(" < "), "{}", html);
    }

    #[test]
    fn test_fallback_space() {
        let mut wrapper = HtmlWrapper::new(None);
        let document = arbor_json::parse("{}").unwrap();
        let node = document.root();
        let html = wrapper.wrap(node, String::new());
        assert!(html.contains("\"> </a>"));
    }
}
