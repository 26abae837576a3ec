//! Construction of typed nodes from existing nodes and raw descriptions.
//!
//! Every constructor checks its arguments against the type expected at
//! their position. An argument that already has a suitable type is kept;
//! a raw one is handed to the expected type's own constructor; anything
//! else is a [`TreeError::Cast`].

use crate::error::{TreeError, TreeResult};
use crate::node::{Content, NodeId};
use crate::tree::Tree;
use arbor_grammar::{RawNode, Rule, Shape, TypeId};

/// One constructor argument
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Detached node already in the arena
    Node(NodeId),
    /// Description still to be cast
    Raw(RawNode),
}

impl From<NodeId> for Part {
    fn from(id: NodeId) -> Self {
        Part::Node(id)
    }
}

impl From<RawNode> for Part {
    fn from(raw: RawNode) -> Self {
        Part::Raw(raw)
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::Raw(RawNode::text(text))
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Part::Raw(RawNode::Text(text))
    }
}

/// Types whose defaults are being built, innermost last
type Guard = Vec<TypeId>;

impl Tree {
    /// Cast a part into a node that extends `expected`
    pub fn build(&mut self, expected: TypeId, part: impl Into<Part>) -> TreeResult<NodeId> {
        self.cast(expected, part.into(), &mut Guard::new())
    }

    /// Leaf of a literal type, validated against its pattern
    pub fn literal(&mut self, ty: TypeId, value: impl Into<String>) -> TreeResult<NodeId> {
        let value = value.into();
        let desc = self.table().get(ty);
        let pattern = match &desc.rule {
            Rule::Literal(pattern) => pattern,
            Rule::Abstract => return Err(TreeError::Abstract(desc.name.clone())),
            _ => return Err(TreeError::NotLiteral(desc.name.clone())),
        };
        if !pattern.matches(&value) {
            return Err(TreeError::InvalidLiteral {
                ty: desc.name.clone(),
                value,
            });
        }
        Ok(self.alloc(ty, Content::Leaf(value)))
    }

    /// Fixed node with exactly one part per slot
    pub fn fixed(&mut self, ty: TypeId, parts: Vec<Part>) -> TreeResult<NodeId> {
        self.fixed_guarded(ty, parts, &mut Guard::new())
    }

    /// Variable node holding `parts` in order
    pub fn variable(&mut self, ty: TypeId, parts: Vec<Part>) -> TreeResult<NodeId> {
        self.variable_guarded(ty, parts, &mut Guard::new())
    }

    /// Fresh default instance of a concrete type
    pub fn instantiate(&mut self, ty: TypeId) -> TreeResult<NodeId> {
        let desc = self.table().get(ty);
        if desc.is_abstract() {
            return Err(TreeError::Abstract(desc.name.clone()));
        }
        self.default_for(ty, &mut Guard::new())
    }

    /// Default instance for a position expecting `expected`.
    ///
    /// Unlike [`Tree::instantiate`] this accepts an abstract type that
    /// names a concrete default, which is how abstract slots get filled.
    pub fn default_of(&mut self, expected: TypeId) -> TreeResult<NodeId> {
        self.default_for(expected, &mut Guard::new())
    }

    /// Rebuild a snapshot as fresh, detached nodes
    pub fn graft(&mut self, raw: &RawNode) -> TreeResult<NodeId> {
        match raw.kind() {
            Some(kind) => {
                let ty = self.lookup(kind)?;
                self.cast(ty, Part::Raw(raw.clone()), &mut Guard::new())
            }
            None => Err(TreeError::Cast {
                value: raw.to_string(),
                expected: "a typed node".to_string(),
                actual: "text".to_string(),
            }),
        }
    }

    /// Value copy of a subtree that no longer refers to this arena
    pub fn snapshot(&self, id: NodeId) -> RawNode {
        let kind = self.type_name(id).to_string();
        match self.value(id) {
            Some(value) => RawNode::literal(kind, value),
            None => RawNode::node(
                kind,
                self.children(id)
                    .iter()
                    .map(|&child| self.snapshot(child))
                    .collect(),
            ),
        }
    }

    /// Structural clone sharing nothing with the source
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let ty = self.type_of(id);
        let content = match self.value(id) {
            Some(value) => Content::Leaf(value.to_string()),
            None => {
                let children: Vec<NodeId> = self.children(id).to_vec();
                let copies = children.into_iter().map(|c| self.deep_copy(c)).collect();
                match self.shape(id) {
                    Shape::Fixed => Content::Fixed(copies),
                    _ => Content::Variable(copies),
                }
            }
        };
        self.alloc(ty, content)
    }

    fn cast(&mut self, expected: TypeId, part: Part, guard: &mut Guard) -> TreeResult<NodeId> {
        match part {
            Part::Node(id) => {
                if !self.is_instance(id, expected) {
                    return Err(TreeError::Cast {
                        value: format!("node {}", id),
                        expected: self.table().name_of(expected).to_string(),
                        actual: self.type_name(id).to_string(),
                    });
                }
                if self.parent(id).is_some() {
                    return Err(TreeError::AlreadyAttached);
                }
                Ok(id)
            }
            Part::Raw(raw) => self.cast_raw(expected, raw, guard),
        }
    }

    fn cast_raw(&mut self, expected: TypeId, raw: RawNode, guard: &mut Guard) -> TreeResult<NodeId> {
        match raw {
            RawNode::Node {
                kind,
                value,
                children,
            } => {
                let ty = self.lookup(&kind)?;
                if !self.table().extends(ty, expected) {
                    return Err(TreeError::Cast {
                        value: RawNode::Node {
                            kind: kind.clone(),
                            value,
                            children,
                        }
                        .to_string(),
                        expected: self.table().name_of(expected).to_string(),
                        actual: kind,
                    });
                }
                self.construct(ty, value, children, guard)
            }
            RawNode::Text(text) => {
                let desc = self.table().get(expected);
                match &desc.rule {
                    Rule::Literal(_) => self.literal(expected, text),
                    // A single-slot type's constructor wraps the bare value
                    Rule::Fixed(slots) if slots.len() == 1 => {
                        self.fixed_guarded(expected, vec![Part::Raw(RawNode::Text(text))], guard)
                    }
                    _ => Err(TreeError::Cast {
                        value: format!("{:?}", text),
                        expected: desc.name.clone(),
                        actual: "text".to_string(),
                    }),
                }
            }
        }
    }

    /// Invoke the constructor of `ty` on raw arguments
    fn construct(
        &mut self,
        ty: TypeId,
        value: Option<String>,
        children: Vec<RawNode>,
        guard: &mut Guard,
    ) -> TreeResult<NodeId> {
        let desc = self.table().get(ty);
        match &desc.rule {
            Rule::Abstract => Err(TreeError::Abstract(desc.name.clone())),
            Rule::Literal(_) => {
                if !children.is_empty() {
                    return Err(TreeError::Arity {
                        ty: desc.name.clone(),
                        expected: 0,
                        found: children.len(),
                    });
                }
                match value {
                    Some(value) => self.literal(ty, value),
                    None => self.default_for(ty, guard),
                }
            }
            Rule::Fixed(slots) => {
                // `{"type": "Call"}` alone stands for the default instance
                if children.is_empty() && !slots.is_empty() {
                    return match value {
                        Some(text) => self.cast_raw(ty, RawNode::Text(text), guard),
                        None => self.default_for(ty, guard),
                    };
                }
                let parts = children.into_iter().map(Part::Raw).collect();
                self.fixed_guarded(ty, parts, guard)
            }
            Rule::Repeated { .. } => {
                let parts = children.into_iter().map(Part::Raw).collect();
                self.variable_guarded(ty, parts, guard)
            }
        }
    }

    fn fixed_guarded(&mut self, ty: TypeId, parts: Vec<Part>, guard: &mut Guard) -> TreeResult<NodeId> {
        let desc = self.table().get(ty);
        let slots = match &desc.rule {
            Rule::Fixed(slots) => slots.iter().map(|slot| slot.ty).collect::<Vec<_>>(),
            Rule::Abstract => return Err(TreeError::Abstract(desc.name.clone())),
            _ => {
                return Err(TreeError::TypeMismatch {
                    expected: "a fixed type".to_string(),
                    found: desc.name.clone(),
                })
            }
        };
        if parts.len() != slots.len() {
            return Err(TreeError::Arity {
                ty: desc.name.clone(),
                expected: slots.len(),
                found: parts.len(),
            });
        }

        let mut children = Vec::with_capacity(parts.len());
        for (slot, part) in slots.into_iter().zip(parts) {
            children.push(self.cast(slot, part, guard)?);
        }
        self.adopt(ty, Content::Fixed(children))
    }

    fn variable_guarded(
        &mut self,
        ty: TypeId,
        parts: Vec<Part>,
        guard: &mut Guard,
    ) -> TreeResult<NodeId> {
        let desc = self.table().get(ty);
        let (child, min_len) = match &desc.rule {
            Rule::Repeated { child, min_len } => (*child, *min_len),
            Rule::Abstract => return Err(TreeError::Abstract(desc.name.clone())),
            _ => return Err(TreeError::NotVariable(desc.name.clone())),
        };
        if parts.len() < min_len {
            return Err(TreeError::BelowMinimum {
                ty: desc.name.clone(),
                min_len,
            });
        }

        let mut children = Vec::with_capacity(parts.len());
        for part in parts {
            children.push(self.cast(child, part, guard)?);
        }
        self.adopt(ty, Content::Variable(children))
    }

    /// Allocate a parent for freshly cast children, refusing duplicates
    fn adopt(&mut self, ty: TypeId, content: Content) -> TreeResult<NodeId> {
        let mut seen = content.children().to_vec();
        seen.sort();
        seen.dedup();
        if seen.len() != content.children().len() {
            return Err(TreeError::AlreadyAttached);
        }
        Ok(self.alloc(ty, content))
    }

    fn default_for(&mut self, ty: TypeId, guard: &mut Guard) -> TreeResult<NodeId> {
        let name = self.table().name_of(ty).to_string();
        if guard.contains(&ty) {
            return Err(TreeError::NoDefault(name));
        }
        guard.push(ty);
        let result = self.derive_default(ty, guard);
        guard.pop();

        // Anything below a failed default is equally unbuildable
        result.map_err(|err| match err {
            TreeError::Abstract(_) => TreeError::NoDefault(name),
            other => other,
        })
    }

    fn derive_default(&mut self, ty: TypeId, guard: &mut Guard) -> TreeResult<NodeId> {
        let desc = self.table().get(ty);
        if let Some(raw) = desc.meta.default.clone() {
            return self.cast_raw(ty, raw, guard);
        }

        match &desc.rule {
            Rule::Abstract => Err(TreeError::NoDefault(desc.name.clone())),
            Rule::Literal(pattern) => {
                if pattern.matches("") {
                    Ok(self.alloc(ty, Content::Leaf(String::new())))
                } else {
                    Err(TreeError::NoDefault(desc.name.clone()))
                }
            }
            Rule::Fixed(slots) => {
                let slots: Vec<TypeId> = slots.iter().map(|slot| slot.ty).collect();
                let mut children = Vec::with_capacity(slots.len());
                for slot in slots {
                    children.push(self.default_for(slot, guard)?);
                }
                Ok(self.alloc(ty, Content::Fixed(children)))
            }
            Rule::Repeated { child, min_len } => {
                let (child, min_len) = (*child, *min_len);
                let mut children = Vec::with_capacity(min_len);
                for _ in 0..min_len {
                    children.push(self.default_for(child, guard)?);
                }
                Ok(self.alloc(ty, Content::Variable(children)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_grammar::{compile_language, LanguageConfig};
    use std::sync::Arc;

    fn tree() -> Tree {
        let config = LanguageConfig::new("test")
            .rule("Expression", "?")
            .rule("Identifier(Expression)", "/[a-z]+/")
            .rule("Number(Expression)", "/[0-9]+/")
            .rule("Call(Expression)", "callee:Identifier args:Arguments")
            .rule("Arguments", "Expression*")
            .rule("Paren(Expression)", "Expression")
            .rule("Loop(Expression)", "Loop")
            .default_node("Identifier", "x")
            .default_node("Expression", RawNode::literal("Identifier", "x"));
        Tree::new(Arc::new(compile_language(&config).unwrap()))
    }

    #[test]
    fn test_keeps_typed_argument() {
        let mut tree = tree();
        let ident = tree.lookup("Identifier").unwrap();
        let expr = tree.lookup("Expression").unwrap();

        let id = tree.literal(ident, "f").unwrap();
        assert_eq!(tree.build(expr, id).unwrap(), id);
    }

    #[test]
    fn test_casts_raw_text() {
        let mut tree = tree();
        let call = tree.lookup("Call").unwrap();
        let args = tree.lookup("Arguments").unwrap();

        let empty = tree.variable(args, vec![]).unwrap();
        let id = tree.fixed(call, vec!["print".into(), empty.into()]).unwrap();
        let callee = tree.get(id, 0).unwrap();
        assert_eq!(tree.type_name(callee), "Identifier");
        assert_eq!(tree.value(callee), Some("print"));
        assert_eq!(tree.parent(empty), Some(id));
    }

    #[test]
    fn test_cast_error_names_types() {
        let mut tree = tree();
        let arguments = tree.lookup("Arguments").unwrap();
        let number = tree.lookup("Number").unwrap();
        let ident = tree.lookup("Identifier").unwrap();

        let args = tree.variable(arguments, vec![]).unwrap();
        let err = tree.build(number, args).unwrap_err();
        assert_eq!(
            err,
            TreeError::Cast {
                value: format!("node {}", args),
                expected: "Number".to_string(),
                actual: "Arguments".to_string(),
            }
        );

        let err = tree.build(ident, RawNode::literal("Number", "1")).unwrap_err();
        assert!(matches!(err, TreeError::Cast { actual, .. } if actual == "Number"));

        let err = tree.build(arguments, "text").unwrap_err();
        assert!(matches!(err, TreeError::Cast { .. }));
    }

    #[test]
    fn test_single_slot_wraps_text() {
        let mut tree = tree();
        let paren = tree.lookup("Paren").unwrap();

        // Expression is abstract, so the bare text cannot be wrapped
        assert!(tree.build(paren, "a").is_err());

        let id = tree
            .build(paren, RawNode::node("Paren", vec![RawNode::literal("Identifier", "a")]))
            .unwrap();
        assert_eq!(tree.type_name(tree.get(id, 0).unwrap()), "Identifier");
    }

    #[test]
    fn test_arity() {
        let mut tree = tree();
        let call = tree.lookup("Call").unwrap();
        let err = tree.fixed(call, vec!["f".into()]).unwrap_err();
        assert_eq!(
            err,
            TreeError::Arity {
                ty: "Call".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_instantiate() {
        let mut tree = tree();
        let call = tree.lookup("Call").unwrap();
        let expr = tree.lookup("Expression").unwrap();

        let id = tree.instantiate(call).unwrap();
        assert_eq!(
            tree.snapshot(id),
            RawNode::node(
                "Call",
                vec![
                    RawNode::literal("Identifier", "x"),
                    RawNode::node("Arguments", vec![]),
                ]
            )
        );

        assert_eq!(tree.instantiate(expr), Err(TreeError::Abstract("Expression".into())));
        let filled = tree.default_of(expr).unwrap();
        assert_eq!(tree.type_name(filled), "Identifier");
    }

    #[test]
    fn test_self_referencing_default() {
        let mut tree = tree();
        let looping = tree.lookup("Loop").unwrap();
        assert_eq!(tree.instantiate(looping), Err(TreeError::NoDefault("Loop".into())));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut tree = tree();
        let call = tree.lookup("Call").unwrap();

        let original = tree.instantiate(call).unwrap();
        let copy = tree.deep_copy(original);
        assert_ne!(copy, original);
        assert_eq!(tree.snapshot(copy), tree.snapshot(original));
        assert_eq!(tree.parent(copy), None);

        let callee = tree.get(copy, 0).unwrap();
        assert_ne!(callee, tree.get(original, 0).unwrap());
        tree.set_value(callee, "g").unwrap();
        assert_eq!(tree.value(tree.get(original, 0).unwrap()), Some("x"));
    }

    #[test]
    fn test_graft_snapshot() {
        let mut tree = tree();
        let call = tree.lookup("Call").unwrap();
        let original = tree.instantiate(call).unwrap();

        let snapshot = tree.snapshot(original);
        let grafted = tree.graft(&snapshot).unwrap();
        assert_ne!(grafted, original);
        assert_eq!(tree.snapshot(grafted), snapshot);

        assert!(tree.graft(&RawNode::text("x")).is_err());
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let mut tree = tree();
        let args = tree.lookup("Arguments").unwrap();
        let ident = tree.lookup("Identifier").unwrap();

        let a = tree.literal(ident, "a").unwrap();
        let err = tree.variable(args, vec![a.into(), a.into()]).unwrap_err();
        assert_eq!(err, TreeError::AlreadyAttached);
        assert_eq!(tree.parent(a), None);
    }
}
