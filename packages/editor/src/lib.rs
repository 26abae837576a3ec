//! # Arbor Editor
//!
//! Reversible editing of arbor trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: text → Document (tree + root)       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: selection + actions + history       │
//! │  - Check availability before every action   │
//! │  - Record tree-altering actions for undo    │
//! │  - Redo re-executes the same action         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: tree → text, through a wrapper    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is always complete**: new structure is filled with defaults
//! 2. **Availability first**: an available action cannot fail for type reasons
//! 3. **Navigation is free**: only tree edits enter the undo history
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbor_editor::{actions::{Insert, SelectChild}, Editor};
//!
//! let mut editor = Editor::new(document);
//! editor.execute(SelectChild)?;
//! editor.execute(Insert::new(number))?;
//! editor.undo()?;
//! println!("{}", editor.render_text());
//! ```

mod action;
pub mod actions;
mod editor;
mod errors;
mod undo_stack;

pub use action::{Action, Workspace};
pub use editor::{Editor, EditorOptions};
pub use errors::{EditorError, EditorResult};
pub use undo_stack::{HistoryEntry, UndoStack, DEFAULT_MAX_LEVELS};

// Re-export common types for convenience
pub use arbor_tree::{Document, NodeId, Surface};
