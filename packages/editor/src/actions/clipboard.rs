use super::delete::Delete;
use super::insert::{place, unplace, Placed, Target};
use crate::action::{applied, ensure_available, Action, Workspace};
use crate::errors::EditorResult;
use arbor_tree::{NodeId, TypeId};

/// Store a value copy of the selection. Leaves the tree alone.
#[derive(Debug, Clone, Default)]
pub struct Copy;

impl Action for Copy {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn is_available(&self, _workspace: &Workspace, _selected: NodeId) -> bool {
        true
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        workspace.clipboard = Some(workspace.tree.snapshot(selected));
        Ok(selected)
    }
}

/// Copy followed by Delete
#[derive(Debug, Clone, Default)]
pub struct Cut {
    copy: Copy,
    delete: Delete,
}

impl Cut {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Action for Cut {
    fn name(&self) -> &'static str {
        "cut"
    }

    fn alters(&self) -> bool {
        true
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        self.copy.is_available(workspace, selected) && self.delete.is_available(workspace, selected)
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        self.copy.execute(workspace, selected)?;
        self.delete.execute(workspace, selected)
    }

    fn rollback(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        self.delete.rollback(workspace, selected)
    }
}

/// Put a fresh copy of the clipboard at the selection.
///
/// Each instance grafts its own copy once and reuses it on redo, so two
/// pastes never share nodes with each other or with the clipboard.
#[derive(Debug, Clone, Default)]
pub struct Paste {
    before: bool,
    node: Option<NodeId>,
    placed: Option<Placed>,
}

impl Paste {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before() -> Self {
        Self {
            before: true,
            ..Self::default()
        }
    }

    fn build(&mut self, workspace: &mut Workspace) -> EditorResult<NodeId> {
        if let Some(node) = self.node {
            return Ok(node);
        }
        let raw = applied(self, workspace.clipboard.as_ref())?;
        let node = workspace.tree.graft(raw)?;
        self.node = Some(node);
        Ok(node)
    }

    /// Type of the node this paste puts down
    fn pasted_type(&self, workspace: &Workspace) -> Option<TypeId> {
        match self.node {
            Some(node) => Some(workspace.tree.type_of(node)),
            None => workspace
                .clipboard
                .as_ref()
                .and_then(|raw| raw.kind())
                .and_then(|kind| workspace.tree.table().lookup(kind)),
        }
    }
}

impl Action for Paste {
    fn name(&self) -> &'static str {
        "paste"
    }

    fn alters(&self) -> bool {
        true
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        self.pasted_type(workspace)
            .and_then(|ty| Target::find(workspace, selected, self.before, ty))
            .is_some()
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        let target = self
            .pasted_type(workspace)
            .and_then(|ty| Target::find(workspace, selected, self.before, ty));
        let target = applied(self, target)?;

        let node = self.build(workspace)?;
        self.placed = Some(place(workspace, target, node, selected)?);
        Ok(node)
    }

    fn rollback(&mut self, workspace: &mut Workspace, _selected: NodeId) -> EditorResult<NodeId> {
        let placed = self.placed.take();
        unplace(workspace, applied(self, placed)?)
    }
}
