use crate::node::{NodeId, NodeRef};
use crate::render::{Renderer, Surface, Wrapper};
use crate::tree::Tree;

/// A tree together with the node it is rooted at, as returned by parsers
#[derive(Debug, Clone)]
pub struct Document {
    pub tree: Tree,
    pub root: NodeId,
}

impl Document {
    pub fn new(tree: Tree, root: NodeId) -> Self {
        Self { tree, root }
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.tree.node(self.root)
    }

    pub fn render(&self, surface: Surface, wrapper: &mut dyn Wrapper) -> String {
        Renderer::new(&self.tree)
            .surface(surface)
            .render(self.root, wrapper)
    }

    /// Output text with no decoration
    pub fn render_text(&self) -> String {
        Renderer::new(&self.tree).render_plain(self.root)
    }
}
