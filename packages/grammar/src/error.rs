use crate::template::TemplateError;
use thiserror::Error;

pub type GrammarResult<T> = Result<T, GrammarError>;

/// Errors raised while compiling a grammar or attaching its metadata.
///
/// All of them mean the grammar description itself is malformed.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    #[error("Type `{0}` is defined more than once")]
    DuplicateType(String),

    #[error("Unresolved type `{name}` referenced by `{referenced_by}`")]
    UnresolvedReference { name: String, referenced_by: String },

    #[error("Type `{0}` inherits from itself")]
    InheritanceCycle(String),

    #[error("Invalid pattern for `{ty}`: {source}")]
    InvalidPattern {
        ty: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid template for `{ty}`: {source}")]
    Template {
        ty: String,
        #[source]
        source: TemplateError,
    },

    #[error("Escape key `{key}` for `{ty}` must be a single character")]
    InvalidEscape { ty: String, key: String },

    #[error("Default for `{ty}` cannot be built: {reason}")]
    InvalidDefault { ty: String, reason: String },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GrammarError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRule(message.into())
    }

    pub fn unresolved(name: impl Into<String>, referenced_by: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            name: name.into(),
            referenced_by: referenced_by.into(),
        }
    }
}
