use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised by tree construction and mutation.
///
/// `Cast` is the construction-time failure; everything else is a mutation
/// the caller should have ruled out by checking availability first.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Cannot cast {value} into `{expected}` (found {actual})")]
    Cast {
        value: String,
        expected: String,
        actual: String,
    },

    #[error("`{ty}` expects {expected} children, got {found}")]
    Arity {
        ty: String,
        expected: usize,
        found: usize,
    },

    #[error("Type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    #[error("`{0}` is abstract and cannot be instantiated")]
    Abstract(String),

    #[error("Unknown type `{0}`")]
    UnknownType(String),

    #[error("`{0}` has no default instance")]
    NoDefault(String),

    #[error("Index {index} out of range for node with {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("`{0}` does not support insertion or removal")]
    NotVariable(String),

    #[error("`{0}` does not hold a value")]
    NotLiteral(String),

    #[error("`{ty}` requires at least {min_len} children")]
    BelowMinimum { ty: String, min_len: usize },

    #[error("Value {value:?} does not match the pattern of `{ty}`")]
    InvalidLiteral { ty: String, value: String },

    #[error("Node is already attached to a parent")]
    AlreadyAttached,

    #[error("Would create cycle")]
    WouldCycle,
}
