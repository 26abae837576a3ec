use crate::tree::Tree;
use arbor_grammar::{Descriptor, Shape, TypeId};
use std::fmt;

/// Index of a node inside its [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Content {
    Leaf(String),
    Fixed(Vec<NodeId>),
    Variable(Vec<NodeId>),
}

impl Content {
    pub(crate) fn shape(&self) -> Shape {
        match self {
            Content::Leaf(_) => Shape::Leaf,
            Content::Fixed(_) => Shape::Fixed,
            Content::Variable(_) => Shape::Variable,
        }
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        match self {
            Content::Leaf(_) => &[],
            Content::Fixed(children) | Content::Variable(children) => children,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) ty: TypeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) content: Content,
}

/// Borrowed view of one node, handed to render wrappers
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub(crate) fn new(tree: &'t Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn ty(&self) -> TypeId {
        self.tree.type_of(self.id)
    }

    pub fn descriptor(&self) -> &'t Descriptor {
        self.tree.table().get(self.ty())
    }

    pub fn type_name(&self) -> &'t str {
        &self.descriptor().name
    }

    pub fn shape(&self) -> Shape {
        self.tree.shape(self.id)
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.tree.parent(self.id).map(|id| NodeRef::new(self.tree, id))
    }

    pub fn children(&self) -> &'t [NodeId] {
        self.tree.children(self.id)
    }

    pub fn value(&self) -> Option<&'t str> {
        self.tree.value(self.id)
    }

    pub fn len(&self) -> usize {
        self.tree.len(self.id)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("type", &self.type_name())
            .finish()
    }
}
