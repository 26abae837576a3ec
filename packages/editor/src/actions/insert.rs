use crate::action::{applied, ensure_available, Action, Workspace};
use crate::errors::EditorResult;
use arbor_tree::{NodeId, Shape, TypeId};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Overwrite the occupant of a fixed slot
    Replace,
    /// Grow a variable node
    Insert,
}

/// Where a new node goes relative to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Target {
    pub parent: NodeId,
    pub index: usize,
    pub mode: Mode,
}

impl Target {
    /// Where a node of type `ty` would go. A fixed parent has the selected
    /// slot replaced and a variable parent grows after the selection (or
    /// before it). An empty list takes the node inside only when there is
    /// no such place that accepts `ty`.
    pub fn find(
        workspace: &Workspace,
        selected: NodeId,
        before: bool,
        ty: TypeId,
    ) -> Option<Self> {
        let tree = &workspace.tree;
        let around = tree
            .position(selected)
            .and_then(|(parent, index)| match tree.shape(parent) {
                Shape::Fixed => Some(Self {
                    parent,
                    index,
                    mode: Mode::Replace,
                }),
                Shape::Variable => Some(Self {
                    parent,
                    index: if before { index } else { index + 1 },
                    mode: Mode::Insert,
                }),
                Shape::Leaf => None,
            });
        if let Some(target) = around.filter(|target| target.accepts(workspace, ty)) {
            return Some(target);
        }

        let inside = Self {
            parent: selected,
            index: 0,
            mode: Mode::Insert,
        };
        let empty = tree.shape(selected) == Shape::Variable && tree.len(selected) == 0;
        Some(inside).filter(|target| empty && target.accepts(workspace, ty))
    }

    fn accepts(&self, workspace: &Workspace, ty: TypeId) -> bool {
        workspace.tree.can_insert(self.parent, self.index, ty)
    }
}

/// One completed placement, enough to reverse it
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placed {
    prior: NodeId,
    target: Target,
    replaced: Option<NodeId>,
}

pub(crate) fn place(
    workspace: &mut Workspace,
    target: Target,
    node: NodeId,
    prior: NodeId,
) -> EditorResult<Placed> {
    let replaced = match target.mode {
        Mode::Replace => Some(workspace.tree.replace(target.parent, target.index, node)?),
        Mode::Insert => {
            workspace.tree.insert_at(target.parent, target.index, node)?;
            None
        }
    };
    Ok(Placed {
        prior,
        target,
        replaced,
    })
}

/// Reverse a placement and return the selection it started from
pub(crate) fn unplace(workspace: &mut Workspace, placed: Placed) -> EditorResult<NodeId> {
    let Target { parent, index, .. } = placed.target;
    match placed.replaced {
        Some(old) => {
            workspace.tree.replace(parent, index, old)?;
        }
        None => {
            workspace.tree.remove_at(parent, index)?;
        }
    }
    Ok(placed.prior)
}

/// Put the default instance of a type at the selection
#[derive(Debug, Clone)]
pub struct Insert {
    ty: TypeId,
    before: bool,
    /// Built on first execution and reused on redo
    node: Option<NodeId>,
    placed: Option<Placed>,
}

impl Insert {
    pub fn new(ty: TypeId) -> Self {
        Self {
            ty,
            before: false,
            node: None,
            placed: None,
        }
    }

    pub fn before(ty: TypeId) -> Self {
        Self {
            before: true,
            ..Self::new(ty)
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    fn build(&mut self, workspace: &mut Workspace) -> EditorResult<NodeId> {
        if let Some(node) = self.node {
            return Ok(node);
        }

        let tree = &mut workspace.tree;
        let node = tree.instantiate(self.ty)?;
        let leaves: Vec<NodeId> = tree
            .descendants(node)
            .filter(|&id| tree.shape(id) == Shape::Leaf)
            .collect();
        for leaf in leaves {
            tree.mark_placeholder(leaf);
        }

        self.node = Some(node);
        Ok(node)
    }
}

impl Action for Insert {
    fn name(&self) -> &'static str {
        "insert"
    }

    fn alters(&self) -> bool {
        true
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        !workspace.tree.table().get(self.ty).is_abstract()
            && Target::find(workspace, selected, self.before, self.ty).is_some()
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        let target = applied(self, Target::find(workspace, selected, self.before, self.ty))?;

        let node = self.build(workspace)?;
        self.placed = Some(place(workspace, target, node, selected)?);
        trace!(node = %node, ty = %workspace.tree.type_name(node), "inserted");
        Ok(node)
    }

    fn rollback(&mut self, workspace: &mut Workspace, _selected: NodeId) -> EditorResult<NodeId> {
        let placed = self.placed.take();
        unplace(workspace, applied(self, placed)?)
    }
}
