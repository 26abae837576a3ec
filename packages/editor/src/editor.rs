use crate::action::{Action, Workspace};
use crate::errors::{EditorError, EditorResult};
use crate::undo_stack::{HistoryEntry, UndoStack, DEFAULT_MAX_LEVELS};
use arbor_tree::{Document, NodeId, RawNode, Renderer, Surface, Tree, Wrapper};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Undo levels kept (0 = unlimited)
    pub max_history: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_LEVELS,
        }
    }
}

/// One editing session over a document: the selection, the clipboard and
/// the undo/redo history
#[derive(Debug)]
pub struct Editor {
    workspace: Workspace,
    selected: NodeId,
    history: UndoStack,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self::with_options(document, EditorOptions::default())
    }

    pub fn with_options(document: Document, options: EditorOptions) -> Self {
        let selected = document.root;
        Self {
            workspace: Workspace::new(document),
            selected,
            history: UndoStack::with_max_levels(options.max_history),
        }
    }

    pub fn is_available(&self, action: &dyn Action) -> bool {
        action.is_available(&self.workspace, self.selected)
    }

    /// Run an action at the current selection.
    ///
    /// Only tree-altering actions enter the history; recording one
    /// invalidates everything that could have been redone.
    pub fn execute(&mut self, action: impl Action + 'static) -> EditorResult<NodeId> {
        self.execute_boxed(Box::new(action))
    }

    /// [`Editor::execute`] for actions chosen at runtime
    pub fn execute_boxed(&mut self, mut action: Box<dyn Action>) -> EditorResult<NodeId> {
        if !action.is_available(&self.workspace, self.selected) {
            return Err(EditorError::precondition(action.name()));
        }

        let prior = self.selected;
        let selected = action.execute(&mut self.workspace, prior)?;
        debug!(action = action.name(), from = %prior, to = %selected, "Executed action");

        if action.alters() {
            self.history.push(HistoryEntry::new(prior, action));
        }
        self.select(selected);
        Ok(selected)
    }

    pub fn undo(&mut self) -> EditorResult<NodeId> {
        let mut entry = self.history.pop_undo().ok_or(EditorError::NothingToUndo)?;

        match entry.action.rollback(&mut self.workspace, self.selected) {
            Ok(selected) => {
                debug!(action = entry.description(), to = %selected, "Undid action");
                self.history.push_redo(entry);
                self.select(selected);
                Ok(selected)
            }
            Err(err) => {
                self.history.push_undo(entry);
                Err(err)
            }
        }
    }

    pub fn redo(&mut self) -> EditorResult<NodeId> {
        let mut entry = self.history.pop_redo().ok_or(EditorError::NothingToRedo)?;

        match entry.action.execute(&mut self.workspace, entry.prior) {
            Ok(selected) => {
                debug!(action = entry.description(), to = %selected, "Redid action");
                self.history.push_undo(entry);
                self.select(selected);
                Ok(selected)
            }
            Err(err) => {
                self.history.push_redo(entry);
                Err(err)
            }
        }
    }

    fn select(&mut self, selected: NodeId) {
        self.selected = selected;
        self.workspace.remember(selected);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_levels(&self) -> usize {
        self.history.undo_levels()
    }

    pub fn redo_levels(&self) -> usize {
        self.history.redo_levels()
    }

    pub fn undo_description(&self) -> Option<&'static str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&'static str> {
        self.history.redo_description()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn selected(&self) -> NodeId {
        self.selected
    }

    pub fn root(&self) -> NodeId {
        self.workspace.root()
    }

    pub fn tree(&self) -> &Tree {
        &self.workspace.tree
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn clipboard(&self) -> Option<&RawNode> {
        self.workspace.clipboard.as_ref()
    }

    /// Load a value copied from another session.
    ///
    /// The value must build under this session's language, so a later
    /// Paste that is available cannot fail on it. A rejected value leaves
    /// the clipboard as it was.
    pub fn set_clipboard(&mut self, raw: RawNode) -> EditorResult<()> {
        Tree::new(self.workspace.tree.table_handle()).graft(&raw)?;
        self.workspace.clipboard = Some(raw);
        Ok(())
    }

    pub fn render(&self, surface: Surface, wrapper: &mut dyn Wrapper) -> String {
        Renderer::new(&self.workspace.tree)
            .surface(surface)
            .render(self.root(), wrapper)
    }

    /// Output text of the whole document
    pub fn render_text(&self) -> String {
        Renderer::new(&self.workspace.tree).render_plain(self.root())
    }

    pub fn into_document(self) -> Document {
        self.workspace.into_document()
    }
}
