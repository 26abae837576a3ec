//! # Arbor JSON
//!
//! JSON as an arbor language. The grammar lives in `json.language.json`;
//! the parser turns JSON text into a typed [`Document`] of that language.
//!
//! String values are stored unescaped and escaped again by the renderer,
//! so `render_text()` of a parsed document is canonical, indented JSON.
//!
//! ```rust,ignore
//! let document = arbor_json::parse(r#"{"a": [1, true]}"#)?;
//! assert_eq!(document.render_text(), "{\n  \"a\": [\n    1,\n    true\n  ]\n}");
//! ```

pub mod error;
pub mod parser;
pub mod tokenizer;

pub use error::{format_error, ParseError, ParseResult};
pub use parser::{Parser, MAX_DEPTH};
pub use tokenizer::{tokenize, Token};

use arbor_grammar::{GrammarResult, LanguageConfig};
use arbor_tree::{Document, Language};

/// The language description shipped with this crate
pub const LANGUAGE_SOURCE: &str = include_str!("json.language.json");

pub fn config() -> GrammarResult<LanguageConfig> {
    LanguageConfig::from_json(LANGUAGE_SOURCE)
}

/// Compile the JSON language
pub fn language() -> GrammarResult<Language> {
    Language::from_json(LANGUAGE_SOURCE)
}

/// Parse JSON text into a document of the JSON language
pub fn parse(source: &str) -> ParseResult<Document> {
    let language = language()?;
    parse_with(&language, source)
}

/// Parse with an already compiled language, which must define the JSON types
pub fn parse_with(language: &Language, source: &str) -> ParseResult<Document> {
    Parser::new(language, source)?.parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_compiles() {
        let language = language().unwrap();
        assert_eq!(language.name(), "json");

        let table = language.table();
        let value = table.lookup("Value").unwrap();
        for name in ["String", "Number", "True", "False", "Null", "Array", "Object"] {
            assert!(table.extends(table.lookup(name).unwrap(), value), "{}", name);
        }
        assert!(!table.extends(table.lookup("Member").unwrap(), value));
    }

    #[test]
    fn test_parse_scalar() {
        let document = parse("42").unwrap();
        assert_eq!(document.root().type_name(), "Number");
        assert_eq!(document.render_text(), "42");
    }
}
