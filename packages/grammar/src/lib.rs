//! # Arbor Grammar
//!
//! Turns a declarative grammar description into a table of node types.
//!
//! ## Rule format
//!
//! ```text
//! Expression = ?                                  abstract supertype
//! Identifier(Expression) = /[a-z_][a-z0-9_]*/     literal, validated by regex
//! Arguments = Expression*                         variable list (`+` = at least one)
//! Call(Expression) = callee:Identifier Arguments  fixed, positionally typed slots
//! ```
//!
//! Names are declared before any rule is resolved, so a rule may refer to
//! types defined further down (or to itself through a subtype, as
//! `BinOp(Expression) = Expression Expression` does).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbor_grammar::{compile_language, LanguageConfig};
//!
//! let config = LanguageConfig::new("calc")
//!     .rule("Expression", "?")
//!     .rule("Number(Expression)", "/[0-9]+/")
//!     .default_node("Number", "0");
//!
//! let table = compile_language(&config)?;
//! let number = table.lookup("Number").unwrap();
//! assert!(table.extends(number, table.lookup("Expression").unwrap()));
//! ```

mod compiler;
mod config;
mod descriptor;
mod error;
mod raw;
mod template;

pub use compiler::{compile, compile_language, parse_rule_text};
pub use config::LanguageConfig;
pub use descriptor::{Descriptor, Metadata, Pattern, Rule, Shape, Slot, TypeId, TypeTable};
pub use error::{GrammarError, GrammarResult};
pub use raw::RawNode;
pub use template::{Piece, Template, TemplateError};
