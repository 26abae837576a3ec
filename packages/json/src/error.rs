//! Error types for the JSON parser

use arbor_grammar::GrammarError;
use arbor_tree::TreeError;
use std::ops::Range;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: Range<usize>,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Invalid syntax at {span:?}: {message}")]
    InvalidSyntax { span: Range<usize>, message: String },

    #[error("Lexer error at {span:?}: {message}")]
    LexError { span: Range<usize>, message: String },

    #[error("Invalid JSON language description: {0}")]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl ParseError {
    pub fn unexpected_token(
        span: Range<usize>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexError { span, .. } => Some(span.clone()),
            ParseError::UnexpectedEof { .. } | ParseError::Grammar(_) | ParseError::Tree(_) => {
                None
            }
        }
    }

    #[cfg(feature = "pretty-errors")]
    fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. } | ParseError::UnexpectedEof { expected } => {
                format!("expected {}", expected)
            }
            ParseError::InvalidSyntax { message, .. } | ParseError::LexError { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Pretty-print an error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error
        .span()
        .unwrap_or_else(|| source.len().saturating_sub(1)..source.len());

    let report = Report::build(ReportKind::Error, filename, span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, span))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish();

    let mut output = Vec::new();
    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }
    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

/// Plain fallback when ariadne is not compiled in
#[cfg(not(feature = "pretty-errors"))]
pub fn format_error(_source: &str, filename: &str, error: &ParseError) -> String {
    format!("{}: {}", filename, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span() {
        let err = ParseError::invalid_syntax(3..5, "bad escape");
        assert_eq!(err.span(), Some(3..5));
        assert_eq!(ParseError::unexpected_eof("value").span(), None);
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_format_error_mentions_message() {
        let err = ParseError::unexpected_token(4..5, "value", "']'");
        let text = format_error("[1, ]", "input.json", &err);
        assert!(text.contains("expected value"));
        assert!(text.contains("input.json"));
    }
}
