use serde::{Deserialize, Serialize};
use std::fmt;

/// Untyped node description, as produced by parsers and default tables.
///
/// A bare string is a literal value whose type is taken from the slot it is
/// cast into. The object form names its type explicitly:
///
/// ```json
/// { "type": "Member", "children": ["key", { "type": "Number", "value": "1" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNode {
    Text(String),
    Node {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<RawNode>,
    },
}

impl RawNode {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Literal of an explicit type
    pub fn literal(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Node {
            kind: kind.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Fixed or variable node of an explicit type
    pub fn node(kind: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self::Node {
            kind: kind.into(),
            value: None,
            children,
        }
    }

    /// Type name, when the node carries one
    pub fn kind(&self) -> Option<&str> {
        match self {
            RawNode::Text(_) => None,
            RawNode::Node { kind, .. } => Some(kind),
        }
    }
}

impl From<&str> for RawNode {
    fn from(value: &str) -> Self {
        RawNode::Text(value.to_string())
    }
}

impl From<String> for RawNode {
    fn from(value: String) -> Self {
        RawNode::Text(value)
    }
}

impl fmt::Display for RawNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawNode::Text(text) => write!(f, "{:?}", text),
            RawNode::Node {
                kind,
                value: Some(value),
                ..
            } => write!(f, "{}({:?})", kind, value),
            RawNode::Node { kind, children, .. } => {
                write!(f, "{}(", kind)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_both_forms() {
        let raw: RawNode = serde_json::from_str(
            r#"{ "type": "Member", "children": ["key", { "type": "Number", "value": "1" }] }"#,
        )
        .unwrap();

        assert_eq!(
            raw,
            RawNode::node(
                "Member",
                vec![RawNode::text("key"), RawNode::literal("Number", "1")]
            )
        );
    }

    #[test]
    fn test_display() {
        let raw = RawNode::node("Pair", vec!["a".into(), RawNode::literal("Number", "2")]);
        assert_eq!(raw.to_string(), r#"Pair("a", Number("2"))"#);
    }
}
