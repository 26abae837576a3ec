//! # Undo/Redo Stack
//!
//! Tracks executed actions and enables undo/redo.
//!
//! ## Design
//!
//! - Each entry pairs an action with the selection it was executed from
//! - Undo rolls the action back and moves the entry to the redo stack
//! - Redo executes the same action instance again from the recorded selection
//! - New entries clear the redo stack
//! - Beyond the level limit the oldest entries are dropped
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::with_max_levels(2);
//! stack.push(HistoryEntry::new(selected, Box::new(Delete::new())));
//!
//! let entry = stack.pop_undo().unwrap();
//! // roll back, then
//! stack.push_redo(entry);
//! ```

use crate::action::Action;
use arbor_tree::NodeId;
use tracing::trace;

/// Default number of undo levels
pub const DEFAULT_MAX_LEVELS: usize = 100;

/// An executed action and the selection it started from
#[derive(Debug)]
pub struct HistoryEntry {
    pub prior: NodeId,
    pub action: Box<dyn Action>,
}

impl HistoryEntry {
    pub fn new(prior: NodeId, action: Box<dyn Action>) -> Self {
        Self { prior, action }
    }

    pub fn description(&self) -> &'static str {
        self.action.name()
    }
}

/// Undo/redo stack of tree-altering actions
#[derive(Debug)]
pub struct UndoStack {
    /// Executed entries (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Undone entries (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Record a newly executed action
    pub fn push(&mut self, entry: HistoryEntry) {
        self.push_undo(entry);

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Return an entry to the undo stack without touching redo
    pub fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            let dropped = self.undo_stack.remove(0);
            trace!(action = dropped.description(), "Dropped oldest history entry");
        }
    }

    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo_stack.push(entry);
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo_stack.pop()
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.last().map(HistoryEntry::description)
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&'static str> {
        self.redo_stack.last().map(HistoryEntry::description)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
