use crate::action::{applied, ensure_available, Action, Workspace};
use crate::errors::EditorResult;
use arbor_tree::{NodeId, Shape};

#[derive(Debug, Clone, Copy)]
struct Removed {
    parent: NodeId,
    index: usize,
    node: NodeId,
}

/// Remove the selection from its list
#[derive(Debug, Clone, Default)]
pub struct Delete {
    removed: Option<Removed>,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Action for Delete {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn alters(&self) -> bool {
        true
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        let tree = &workspace.tree;
        match tree.parent(selected) {
            Some(parent) => {
                tree.shape(parent) == Shape::Variable && tree.len(parent) > tree.min_len(parent)
            }
            None => false,
        }
    }

    /// Selects the neighbour that takes the removed node's place, the new
    /// last child, or the parent once it is empty
    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        let (parent, index) = applied(self, workspace.tree.position(selected))?;

        let node = workspace.tree.remove_at(parent, index)?;
        self.removed = Some(Removed {
            parent,
            index,
            node,
        });

        let len = workspace.tree.len(parent);
        if len == 0 {
            Ok(parent)
        } else {
            Ok(workspace.tree.get(parent, index.min(len - 1))?)
        }
    }

    fn rollback(&mut self, workspace: &mut Workspace, _selected: NodeId) -> EditorResult<NodeId> {
        let removed = self.removed.take();
        let Removed {
            parent,
            index,
            node,
        } = applied(self, removed)?;
        workspace.tree.insert_at(parent, index, node)?;
        Ok(node)
    }
}
