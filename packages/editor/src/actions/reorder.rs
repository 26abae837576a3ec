use crate::action::{applied, ensure_available, Action, Workspace};
use crate::errors::EditorResult;
use arbor_tree::{NodeId, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct Moved {
    node: NodeId,
    parent: NodeId,
    from: usize,
    to: usize,
}

/// Swap the selection with its neighbour in a list. The moved node stays
/// selected.
#[derive(Debug, Clone)]
pub struct Move {
    direction: Direction,
    moved: Option<Moved>,
}

impl Move {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            moved: None,
        }
    }

    pub fn up() -> Self {
        Self::new(Direction::Up)
    }

    pub fn down() -> Self {
        Self::new(Direction::Down)
    }

    fn destination(&self, workspace: &Workspace, selected: NodeId) -> Option<(NodeId, usize, usize)> {
        let tree = &workspace.tree;
        let (parent, index) = tree.position(selected)?;
        if tree.shape(parent) != Shape::Variable {
            return None;
        }

        let to = match self.direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index + 1,
        };
        (to < tree.len(parent)).then_some((parent, index, to))
    }
}

impl Action for Move {
    fn name(&self) -> &'static str {
        match self.direction {
            Direction::Up => "move up",
            Direction::Down => "move down",
        }
    }

    fn alters(&self) -> bool {
        true
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        self.destination(workspace, selected).is_some()
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        let (parent, from, to) = applied(self, self.destination(workspace, selected))?;

        workspace.tree.move_child(parent, from, to)?;
        self.moved = Some(Moved {
            node: selected,
            parent,
            from,
            to,
        });
        Ok(selected)
    }

    fn rollback(&mut self, workspace: &mut Workspace, _selected: NodeId) -> EditorResult<NodeId> {
        let moved = self.moved.take();
        let Moved {
            node,
            parent,
            from,
            to,
        } = applied(self, moved)?;
        workspace.tree.move_child(parent, to, from)?;
        Ok(node)
    }
}
