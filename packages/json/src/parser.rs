use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use arbor_tree::{Document, Language, NodeId, Part, Tree, TypeId};
use std::ops::Range;
use tracing::debug;

/// Deepest array/object nesting accepted before giving up
pub const MAX_DEPTH: usize = 256;

struct Types {
    string: TypeId,
    number: TypeId,
    true_: TypeId,
    false_: TypeId,
    null: TypeId,
    array: TypeId,
    member: TypeId,
    object: TypeId,
}

impl Types {
    fn resolve(tree: &Tree) -> ParseResult<Self> {
        Ok(Self {
            string: tree.lookup("String")?,
            number: tree.lookup("Number")?,
            true_: tree.lookup("True")?,
            false_: tree.lookup("False")?,
            null: tree.lookup("Null")?,
            array: tree.lookup("Array")?,
            member: tree.lookup("Member")?,
            object: tree.lookup("Object")?,
        })
    }
}

/// Recursive-descent JSON parser that builds typed nodes directly
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    depth: usize,
    tree: Tree,
    types: Types,
}

impl<'src> Parser<'src> {
    pub fn new(language: &Language, source: &'src str) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        let tree = language.new_tree();
        let types = Types::resolve(&tree)?;
        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
            tree,
            types,
        })
    }

    /// Parse exactly one value followed by end of input
    pub fn parse_document(mut self) -> ParseResult<Document> {
        debug!(tokens = self.tokens.len(), "Parsing JSON");

        let root = self.parse_value()?;
        if let Some((token, span)) = self.peek() {
            return Err(ParseError::unexpected_token(
                span.clone(),
                "end of input",
                token.to_string(),
            ));
        }

        debug!(nodes = self.tree.node_count(), "Parsed JSON");
        Ok(Document::new(self.tree, root))
    }

    fn parse_value(&mut self) -> ParseResult<NodeId> {
        let (token, span) = self.next_token("value")?;
        match token {
            Token::LBrace => self.nested(span, Self::parse_object),
            Token::LBracket => self.nested(span, Self::parse_array),
            Token::String(raw) => {
                let text = unescape(raw, span)?;
                Ok(self.tree.literal(self.types.string, text)?)
            }
            Token::Number(n) => Ok(self.tree.literal(self.types.number, n)?),
            Token::True => Ok(self.tree.literal(self.types.true_, "true")?),
            Token::False => Ok(self.tree.literal(self.types.false_, "false")?),
            Token::Null => Ok(self.tree.literal(self.types.null, "null")?),
            other => Err(ParseError::unexpected_token(span, "value", other.to_string())),
        }
    }

    fn nested(
        &mut self,
        span: Range<usize>,
        parse: fn(&mut Self) -> ParseResult<NodeId>,
    ) -> ParseResult<NodeId> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::invalid_syntax(span, "nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Elements after the opening `[`
    fn parse_array(&mut self) -> ParseResult<NodeId> {
        let mut items = Vec::new();
        if !self.match_token(Token::RBracket) {
            loop {
                items.push(Part::Node(self.parse_value()?));
                if self.match_token(Token::RBracket) {
                    break;
                }
                self.expect(Token::Comma, "',' or ']'")?;
            }
        }
        Ok(self.tree.variable(self.types.array, items)?)
    }

    /// Members after the opening `{`
    fn parse_object(&mut self) -> ParseResult<NodeId> {
        let mut members = Vec::new();
        if !self.match_token(Token::RBrace) {
            loop {
                members.push(Part::Node(self.parse_member()?));
                if self.match_token(Token::RBrace) {
                    break;
                }
                self.expect(Token::Comma, "',' or '}'")?;
            }
        }
        Ok(self.tree.variable(self.types.object, members)?)
    }

    fn parse_member(&mut self) -> ParseResult<NodeId> {
        let (token, span) = self.next_token("string key")?;
        let key = match token {
            Token::String(raw) => {
                let text = unescape(raw, span)?;
                self.tree.literal(self.types.string, text)?
            }
            other => {
                return Err(ParseError::unexpected_token(
                    span,
                    "string key",
                    other.to_string(),
                ))
            }
        };

        self.expect(Token::Colon, "':'")?;
        let value = self.parse_value()?;
        Ok(self
            .tree
            .fixed(self.types.member, vec![Part::Node(key), Part::Node(value)])?)
    }

    // Helper methods

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn next_token(&mut self, expected: &str) -> ParseResult<(Token<'src>, Range<usize>)> {
        let next = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::unexpected_eof(expected))?;
        self.pos += 1;
        Ok(next)
    }

    fn check(&self, token: &Token) -> bool {
        matches!(self.peek(), Some((t, _)) if t == token)
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.check(&token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> ParseResult<()> {
        let (found, span) = self.next_token(expected)?;
        if found == token {
            Ok(())
        } else {
            Err(ParseError::unexpected_token(span, expected, found.to_string()))
        }
    }
}

/// Decode a quoted string token into its text
fn unescape(raw: &str, span: Range<usize>) -> ParseResult<String> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| ParseError::invalid_syntax(span.clone(), "unterminated string"))?;

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }

        let escaped = match chars.next() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => unicode_escape(&mut chars, &span)?,
            Some(other) => {
                return Err(ParseError::invalid_syntax(
                    span,
                    format!("invalid escape '\\{}'", other),
                ))
            }
            None => return Err(ParseError::invalid_syntax(span, "unterminated escape")),
        };
        text.push(escaped);
    }
    Ok(text)
}

/// The rest of a `\u` escape, including a trailing low surrogate if needed
fn unicode_escape(chars: &mut std::str::Chars<'_>, span: &Range<usize>) -> ParseResult<char> {
    let invalid = || ParseError::invalid_syntax(span.clone(), "invalid unicode escape");

    let high = hex4(chars).ok_or_else(invalid)?;
    let code = match high {
        0xD800..=0xDBFF => {
            if chars.next() != Some('\\') || chars.next() != Some('u') {
                return Err(invalid());
            }
            let low = hex4(chars).ok_or_else(invalid)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(invalid());
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        }
        0xDC00..=0xDFFF => return Err(invalid()),
        code => code,
    };
    char::from_u32(code).ok_or_else(invalid)
}

fn hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#""plain""#, 0..7).unwrap(), "plain");
        assert_eq!(
            unescape(r#""a\"b\\c\/d\n\t""#, 0..16).unwrap(),
            "a\"b\\c/d\n\t"
        );
        assert_eq!(unescape(r#""\u00e9""#, 0..8).unwrap(), "\u{e9}");
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(unescape(r#""\ud83d\ude00""#, 0..14).unwrap(), "\u{1f600}");
    }

    #[test]
    fn test_bad_escapes() {
        assert!(matches!(
            unescape(r#""\q""#, 0..4),
            Err(ParseError::InvalidSyntax { .. })
        ));
        assert!(matches!(
            unescape(r#""\u12""#, 0..6),
            Err(ParseError::InvalidSyntax { .. })
        ));
        // Lone surrogates are not characters
        assert!(matches!(
            unescape(r#""\ud83d""#, 0..8),
            Err(ParseError::InvalidSyntax { .. })
        ));
        assert!(matches!(
            unescape(r#""\ude00""#, 0..8),
            Err(ParseError::InvalidSyntax { .. })
        ));
    }
}
