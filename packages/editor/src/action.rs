use crate::errors::{EditorError, EditorResult};
use arbor_tree::{Document, NodeId, RawNode, Tree};
use std::collections::HashMap;
use std::fmt;

/// Everything an action may read or change
#[derive(Debug, Clone)]
pub struct Workspace {
    pub tree: Tree,
    root: NodeId,
    /// Last copied subtree, as a value independent of the arena
    pub clipboard: Option<RawNode>,
    /// Child index last selected under each parent
    child_memory: HashMap<NodeId, usize>,
}

impl Workspace {
    pub fn new(document: Document) -> Self {
        Self {
            tree: document.tree,
            root: document.root,
            clipboard: None,
            child_memory: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` is part of the document rather than a detached leftover
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.tree.is_ancestor(self.root, id)
    }

    pub fn remembered_child(&self, parent: NodeId) -> Option<usize> {
        self.child_memory.get(&parent).copied()
    }

    pub(crate) fn remember(&mut self, selected: NodeId) {
        if let Some((parent, index)) = self.tree.position(selected) {
            self.child_memory.insert(parent, index);
        }
    }

    pub fn into_document(self) -> Document {
        Document::new(self.tree, self.root)
    }
}

/// A reversible command applied at the current selection.
///
/// An instance keeps whatever it needs to undo its own most recent
/// `execute`, so the same instance can be rolled back and executed again
/// for redo.
pub trait Action: fmt::Debug {
    /// Name shown in history descriptions
    fn name(&self) -> &'static str;

    /// Whether the action changes the tree (and so enters the history)
    fn alters(&self) -> bool {
        false
    }

    /// Pure check of the selection, its parent and its position
    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool;

    /// Apply the action and return the new selection
    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId>;

    /// Undo the most recent `execute` and return the selection it started from
    fn rollback(&mut self, _workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        Ok(selected)
    }
}

/// Fail with `PreconditionViolation` unless `action` is available
pub(crate) fn ensure_available<A: Action + ?Sized>(
    action: &A,
    workspace: &Workspace,
    selected: NodeId,
) -> EditorResult<()> {
    if action.is_available(workspace, selected) {
        Ok(())
    } else {
        Err(EditorError::precondition(action.name()))
    }
}

/// Fail with `PreconditionViolation` when there is nothing to roll back
pub(crate) fn applied<T, A: Action + ?Sized>(action: &A, state: Option<T>) -> EditorResult<T> {
    state.ok_or_else(|| EditorError::precondition(action.name()))
}
