//! Error types for the editor

use arbor_tree::TreeError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// An action ran where its availability check fails
    #[error("Action `{action}` is not available at the current selection")]
    PreconditionViolation { action: String },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

impl EditorError {
    pub fn precondition(action: &str) -> Self {
        Self::PreconditionViolation {
            action: action.to_string(),
        }
    }
}
