//! Template expansion from a tree back to text.

use crate::node::{Content, NodeId, NodeRef};
use crate::tree::Tree;
use arbor_grammar::{Descriptor, Template};

/// Which of a type's templates to expand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// Target-language text, as written to a file
    #[default]
    Output,
    /// On-screen text, which may differ from the output
    Display,
}

impl Surface {
    pub fn template<'d>(&self, desc: &'d Descriptor) -> &'d Template {
        match self {
            Surface::Output => &desc.meta.output,
            Surface::Display => &desc.meta.display,
        }
    }
}

/// Per-node decoration hook.
///
/// `wrap` is called once per node, children before parents, with the node's
/// fully expanded text. Whatever it returns is what the parent sees.
pub trait Wrapper {
    fn wrap(&mut self, node: NodeRef<'_>, text: String) -> String;

    /// Plain text entering the output: template text, delimiters,
    /// indentation and escaped literal values
    fn text(&mut self, text: &str) -> String {
        text.to_string()
    }
}

impl<F> Wrapper for F
where
    F: FnMut(NodeRef<'_>, String) -> String,
{
    fn wrap(&mut self, node: NodeRef<'_>, text: String) -> String {
        self(node, text)
    }
}

/// Wrapper that returns the text untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Wrapper for Identity {
    fn wrap(&mut self, _node: NodeRef<'_>, text: String) -> String {
        text
    }
}

pub struct Renderer<'t> {
    tree: &'t Tree,
    surface: Surface,
}

impl<'t> Renderer<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self {
            tree,
            surface: Surface::default(),
        }
    }

    pub fn surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    pub fn render(&self, id: NodeId, wrapper: &mut dyn Wrapper) -> String {
        let desc = self.tree.descriptor(id);
        let template = self.surface.template(desc);

        let text = match self.tree.content(id) {
            Content::Leaf(value) => {
                let value = wrapper.text(&desc.meta.escape(value));
                template.fill_with(&[value], |text| wrapper.text(text))
            }
            Content::Fixed(children) => {
                let parts: Vec<String> = children
                    .iter()
                    .map(|&child| self.render(child, &mut *wrapper))
                    .collect();
                template.fill_with(&parts, |text| wrapper.text(text))
            }
            Content::Variable(children) => {
                let parts: Vec<String> = children
                    .iter()
                    .map(|&child| self.render(child, &mut *wrapper))
                    .collect();
                let delimiter = wrapper.text(&desc.meta.delimiter);
                let joined = parts.join(delimiter.as_str());
                let body = match &desc.meta.indent {
                    Some(indent) if !parts.is_empty() => {
                        let step = wrapper.text(&format!("\n{}", indent));
                        format!("{}{}\n", step, joined.replace('\n', &step))
                    }
                    _ => joined,
                };
                template.fill_with(&[body], |text| wrapper.text(text))
            }
        };

        wrapper.wrap(self.tree.node(id), text)
    }

    pub fn render_plain(&self, id: NodeId) -> String {
        self.render(id, &mut Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_grammar::{compile_language, LanguageConfig};
    use std::sync::Arc;

    fn tree() -> Tree {
        let config = LanguageConfig::new("test")
            .rule("Statement", "?")
            .rule("Identifier", "/[a-z]+/")
            .rule("Assignment(Statement)", "left:Identifier right:Identifier")
            .rule("Block", "Statement*")
            .rule("Text", "/(?s).*/")
            .rule("Names", "Identifier*")
            .output("Assignment", "{left} = {right}")
            .display("Assignment", "{left} := {right}")
            .output("Block", "do{children}end")
            .indent("Block", "  ")
            .delimiter("Block", "\n")
            .output("Text", "\"{value}\"")
            .escape("Text", '"', "\\\"")
            .output("Names", "[{children}]");
        Tree::new(Arc::new(compile_language(&config).unwrap()))
    }

    fn assignment(tree: &mut Tree, left: &str, right: &str) -> NodeId {
        let ty = tree.lookup("Assignment").unwrap();
        tree.fixed(ty, vec![left.into(), right.into()]).unwrap()
    }

    #[test]
    fn test_fixed_template() {
        let mut tree = tree();
        let id = assignment(&mut tree, "a", "b");
        assert_eq!(Renderer::new(&tree).render_plain(id), "a = b");
    }

    #[test]
    fn test_display_surface() {
        let mut tree = tree();
        let id = assignment(&mut tree, "a", "b");
        let text = Renderer::new(&tree)
            .surface(Surface::Display)
            .render_plain(id);
        assert_eq!(text, "a := b");
    }

    #[test]
    fn test_escapes_literal() {
        let mut tree = tree();
        let ty = tree.lookup("Text").unwrap();
        let id = tree.literal(ty, "say \"hi\"").unwrap();
        assert_eq!(Renderer::new(&tree).render_plain(id), r#""say \"hi\"""#);
    }

    #[test]
    fn test_delimiter_and_empty_list() {
        let mut tree = tree();
        let names = tree.lookup("Names").unwrap();

        let empty = tree.variable(names, vec![]).unwrap();
        assert_eq!(Renderer::new(&tree).render_plain(empty), "[]");

        let full = tree
            .variable(names, vec!["a".into(), "b".into(), "c".into()])
            .unwrap();
        assert_eq!(Renderer::new(&tree).render_plain(full), "[a, b, c]");
    }

    #[test]
    fn test_indented_block() {
        let mut tree = tree();
        let block = tree.lookup("Block").unwrap();

        let empty = tree.variable(block, vec![]).unwrap();
        assert_eq!(Renderer::new(&tree).render_plain(empty), "doend");

        let first = assignment(&mut tree, "a", "b");
        let second = assignment(&mut tree, "c", "d");
        let full = tree
            .variable(block, vec![first.into(), second.into()])
            .unwrap();
        assert_eq!(
            Renderer::new(&tree).render_plain(full),
            "do\n  a = b\n  c = d\nend"
        );
    }

    #[test]
    fn test_wrapper_sees_every_node() {
        let mut tree = tree();
        let id = assignment(&mut tree, "a", "b");

        let mut seen = Vec::new();
        let mut wrapper = |node: NodeRef<'_>, text: String| {
            seen.push(node.type_name().to_string());
            format!("<{}>", text)
        };
        let text = Renderer::new(&tree).render(id, &mut wrapper);

        assert_eq!(text, "<<a> = <b>>");
        assert_eq!(seen, vec!["Identifier", "Identifier", "Assignment"]);
    }

    struct Upper;

    impl Wrapper for Upper {
        fn wrap(&mut self, _node: NodeRef<'_>, text: String) -> String {
            text
        }

        fn text(&mut self, text: &str) -> String {
            text.to_uppercase()
        }
    }

    #[test]
    fn test_text_hook_sees_template_text() {
        let mut tree = tree();
        let names = tree.lookup("Names").unwrap();
        let list = tree.variable(names, vec!["a".into(), "b".into()]).unwrap();
        let block = tree.lookup("Block").unwrap();
        let first = assignment(&mut tree, "c", "d");
        let body = tree.variable(block, vec![first.into()]).unwrap();

        let renderer = Renderer::new(&tree);
        assert_eq!(renderer.render(list, &mut Upper), "[A, B]");
        assert_eq!(renderer.render(body, &mut Upper), "DO\n  C = D\nEND");
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut tree = tree();
        let names = tree.lookup("Names").unwrap();
        let id = tree.variable(names, vec!["x".into(), "y".into()]).unwrap();

        let renderer = Renderer::new(&tree);
        assert_eq!(renderer.render_plain(id), renderer.render_plain(id));
    }
}
