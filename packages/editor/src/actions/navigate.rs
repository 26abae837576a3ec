//! Selection changes. None of these touch the tree, so none of them are
//! recorded in the history and their rollback is the default no-op.

use crate::action::{ensure_available, Action, Workspace};
use crate::errors::EditorResult;
use arbor_tree::NodeId;

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectParent;

impl Action for SelectParent {
    fn name(&self) -> &'static str {
        "select parent"
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        workspace.tree.parent(selected).is_some()
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        Ok(workspace.tree.parent(selected).unwrap_or(selected))
    }
}

/// Descend to the child selected last time, or the first one
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectChild;

impl Action for SelectChild {
    fn name(&self) -> &'static str {
        "select child"
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        workspace.tree.len(selected) > 0
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        let len = workspace.tree.len(selected);
        let index = workspace
            .remembered_child(selected)
            .unwrap_or(0)
            .min(len - 1);
        Ok(workspace.tree.get(selected, index)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectNextSibling;

impl Action for SelectNextSibling {
    fn name(&self) -> &'static str {
        "select next sibling"
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        match workspace.tree.position(selected) {
            Some((parent, index)) => index + 1 < workspace.tree.len(parent),
            None => false,
        }
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        match workspace.tree.position(selected) {
            Some((parent, index)) => Ok(workspace.tree.get(parent, index + 1)?),
            None => Ok(selected),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectPrevSibling;

impl Action for SelectPrevSibling {
    fn name(&self) -> &'static str {
        "select previous sibling"
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        matches!(workspace.tree.position(selected), Some((_, index)) if index > 0)
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        match workspace.tree.position(selected) {
            Some((parent, index)) => Ok(workspace.tree.get(parent, index - 1)?),
            None => Ok(selected),
        }
    }
}

/// Jump straight to a node, as a pointer click does
#[derive(Debug, Clone, Copy)]
pub struct Select(pub NodeId);

impl Action for Select {
    fn name(&self) -> &'static str {
        "select"
    }

    fn is_available(&self, workspace: &Workspace, _selected: NodeId) -> bool {
        self.0.index() < workspace.tree.node_count() && workspace.is_attached(self.0)
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        Ok(self.0)
    }
}

/// Move to the next placeholder after the selection in document order,
/// wrapping around at the end
#[derive(Debug, Clone, Copy, Default)]
pub struct NextPlaceholder;

impl NextPlaceholder {
    fn find(workspace: &Workspace, selected: NodeId) -> Option<NodeId> {
        let tree = &workspace.tree;
        if tree.placeholders().is_empty() {
            return None;
        }

        let order: Vec<NodeId> = tree.descendants(workspace.root()).collect();
        let start = order
            .iter()
            .position(|&id| id == selected)
            .map_or(0, |pos| pos + 1);

        order[start..]
            .iter()
            .chain(order[..start].iter())
            .copied()
            .find(|&id| id != selected && tree.is_placeholder(id))
    }
}

impl Action for NextPlaceholder {
    fn name(&self) -> &'static str {
        "next placeholder"
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        Self::find(workspace, selected).is_some()
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        Ok(Self::find(workspace, selected).unwrap_or(selected))
    }
}
