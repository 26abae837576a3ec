//! # Output Templates
//!
//! Python-style format strings: `{name}` or `{0}` placeholders, with `{{` and
//! `}}` standing for literal braces. Placeholders are bound to child
//! positions once, when the grammar is compiled, so rendering never looks a
//! name up.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Unclosed `{{` at {pos}")]
    Unclosed { pos: usize },

    #[error("Unmatched `}}` at {pos}")]
    Unmatched { pos: usize },

    #[error("Unknown placeholder `{{{name}}}`")]
    UnknownPlaceholder { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Text(String),
    /// Index into the rendered parts of a node
    Hole(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse `source`, binding every placeholder through `resolve`
    pub fn compile(
        source: &str,
        resolve: impl Fn(&str) -> Option<usize>,
    ) -> Result<Self, TemplateError> {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    text.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    text.push('}');
                }
                '}' => return Err(TemplateError::Unmatched { pos }),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => return Err(TemplateError::Unclosed { pos }),
                            Some((_, c)) => name.push(c),
                        }
                    }

                    let name = name.trim();
                    let index = resolve(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
                        name: name.to_string(),
                    })?;

                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Hole(index));
                }
                c => text.push(c),
            }
        }

        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    /// Template with no placeholders
    pub fn constant(text: &str) -> Self {
        Self {
            source: text.replace('{', "{{").replace('}', "}}"),
            pieces: if text.is_empty() {
                Vec::new()
            } else {
                vec![Piece::Text(text.to_string())]
            },
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// True when the template is nothing but a single placeholder, so an
    /// empty node renders to an empty string.
    pub fn is_bare_placeholder(&self) -> bool {
        matches!(self.pieces.as_slice(), [Piece::Hole(_)])
    }

    /// Substitute `parts` into the template
    pub fn fill<S: AsRef<str>>(&self, parts: &[S]) -> String {
        self.fill_with(parts, |text| text.to_string())
    }

    /// Like [`Template::fill`], passing the template's own text through
    /// `text` first
    pub fn fill_with<S: AsRef<str>>(
        &self,
        parts: &[S],
        mut text: impl FnMut(&str) -> String,
    ) -> String {
        let mut output = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(literal) => output.push_str(&text(literal)),
                Piece::Hole(index) => {
                    if let Some(part) = parts.get(*index) {
                        output.push_str(part.as_ref());
                    }
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(name: &str) -> Option<usize> {
        match name {
            "left" | "0" => Some(0),
            "right" | "1" => Some(1),
            _ => None,
        }
    }

    #[test]
    fn test_named_and_positional() {
        let template = Template::compile("{left} = {1}", slots).unwrap();
        assert_eq!(template.fill(&["a", "b"]), "a = b");
    }

    #[test]
    fn test_brace_escapes() {
        let template = Template::compile("{{{left}}}", slots).unwrap();
        assert_eq!(template.fill(&["x"]), "{x}");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Template::compile("{left", slots),
            Err(TemplateError::Unclosed { pos: 0 })
        );
        assert_eq!(
            Template::compile("a } b", slots),
            Err(TemplateError::Unmatched { pos: 2 })
        );
        assert_eq!(
            Template::compile("{middle}", slots),
            Err(TemplateError::UnknownPlaceholder {
                name: "middle".to_string()
            })
        );
    }

    #[test]
    fn test_bare_placeholder() {
        assert!(Template::compile("{left}", slots).unwrap().is_bare_placeholder());
        assert!(!Template::compile("[{left}]", slots).unwrap().is_bare_placeholder());
        assert!(!Template::constant("null").is_bare_placeholder());
    }

    #[test]
    fn test_constant_round_trips_braces() {
        let template = Template::constant("{}");
        assert_eq!(template.source(), "{{}}");
        assert_eq!(template.fill::<&str>(&[]), "{}");
    }
}
