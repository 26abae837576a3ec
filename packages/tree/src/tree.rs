use crate::error::{TreeError, TreeResult};
use crate::node::{Content, NodeData, NodeId, NodeRef};
use arbor_grammar::{Descriptor, Rule, Shape, TypeId, TypeTable};
use std::sync::Arc;
use tracing::trace;

/// Arena holding every node built for one language.
///
/// Nodes are never freed. Removing a node detaches it (its parent becomes
/// `None`) and leaves it in the arena, where an undo can reattach it.
#[derive(Debug, Clone)]
pub struct Tree {
    table: Arc<TypeTable>,
    nodes: Vec<NodeData>,
    placeholders: Vec<NodeId>,
}

impl Tree {
    pub fn new(table: Arc<TypeTable>) -> Self {
        Self {
            table,
            nodes: Vec::new(),
            placeholders: Vec::new(),
        }
    }

    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    /// Shared handle to the type table, for building sibling trees
    pub fn table_handle(&self) -> Arc<TypeTable> {
        Arc::clone(&self.table)
    }

    pub fn lookup(&self, name: &str) -> TreeResult<TypeId> {
        self.table
            .lookup(name)
            .ok_or_else(|| TreeError::UnknownType(name.to_string()))
    }

    /// Number of nodes ever allocated, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn alloc(&mut self, ty: TypeId, content: Content) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        for &child in content.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(NodeData {
            ty,
            parent: None,
            content,
        });
        id
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn content(&self, id: NodeId) -> &Content {
        &self.data(id).content
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    pub fn type_of(&self, id: NodeId) -> TypeId {
        self.data(id).ty
    }

    pub fn descriptor(&self, id: NodeId) -> &Descriptor {
        self.table.get(self.type_of(id))
    }

    pub fn type_name(&self, id: NodeId) -> &str {
        self.table.name_of(self.type_of(id))
    }

    pub fn shape(&self, id: NodeId) -> Shape {
        self.data(id).content.shape()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).content.children()
    }

    /// Raw value of a leaf
    pub fn value(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).content {
            Content::Leaf(value) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn get(&self, id: NodeId, index: usize) -> TreeResult<NodeId> {
        let children = self.children(id);
        children
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Position of a node under its own parent
    pub fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        self.index_of(parent, id).map(|index| (parent, index))
    }

    pub fn is_instance(&self, id: NodeId, ty: TypeId) -> bool {
        self.table.extends(self.type_of(id), ty)
    }

    /// Type a child at `index` must extend.
    ///
    /// Fixed nodes answer per slot; variable nodes answer the same type for
    /// every index, including one past the end.
    pub fn expected_type(&self, id: NodeId, index: usize) -> TreeResult<TypeId> {
        match &self.descriptor(id).rule {
            Rule::Fixed(slots) => slots
                .get(index)
                .map(|slot| slot.ty)
                .ok_or(TreeError::IndexOutOfRange {
                    index,
                    len: slots.len(),
                }),
            Rule::Repeated { child, .. } => Ok(*child),
            _ => Err(TreeError::IndexOutOfRange { index, len: 0 }),
        }
    }

    pub fn can_insert(&self, id: NodeId, index: usize, ty: TypeId) -> bool {
        self.expected_type(id, index)
            .map(|expected| self.table.extends(ty, expected))
            .unwrap_or(false)
    }

    /// Smallest length a variable node may shrink to
    pub fn min_len(&self, id: NodeId) -> usize {
        match self.descriptor(id).rule {
            Rule::Repeated { min_len, .. } => min_len,
            _ => 0,
        }
    }

    fn check_attachable(&self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<()> {
        if self.parent(child).is_some() {
            return Err(TreeError::AlreadyAttached);
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::WouldCycle);
        }

        let expected = self.expected_type(parent, index)?;
        if !self.is_instance(child, expected) {
            return Err(TreeError::TypeMismatch {
                expected: self.table.name_of(expected).to_string(),
                found: self.type_name(child).to_string(),
            });
        }
        Ok(())
    }

    /// Put a detached node into an existing slot, returning the detached
    /// previous occupant
    pub fn replace(&mut self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<NodeId> {
        let old = self.get(parent, index)?;
        self.check_attachable(parent, index, child)?;

        trace!(parent = %parent, index, old = %old, new = %child, "replace");
        self.nodes[old.index()].parent = None;
        self.nodes[child.index()].parent = Some(parent);
        if let Content::Fixed(children) | Content::Variable(children) =
            &mut self.nodes[parent.index()].content
        {
            children[index] = child;
        }
        Ok(old)
    }

    pub fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<()> {
        if self.shape(parent) != Shape::Variable {
            return Err(TreeError::NotVariable(self.type_name(parent).to_string()));
        }
        let len = self.len(parent);
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.check_attachable(parent, index, child)?;

        trace!(parent = %parent, index, child = %child, "insert");
        self.nodes[child.index()].parent = Some(parent);
        if let Content::Variable(children) = &mut self.nodes[parent.index()].content {
            children.insert(index, child);
        }
        Ok(())
    }

    pub fn push(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let len = self.len(parent);
        self.insert_at(parent, len, child)
    }

    /// Detach and return the child at `index` of a variable node
    pub fn remove_at(&mut self, parent: NodeId, index: usize) -> TreeResult<NodeId> {
        if self.shape(parent) != Shape::Variable {
            return Err(TreeError::NotVariable(self.type_name(parent).to_string()));
        }
        let child = self.get(parent, index)?;
        let min_len = self.min_len(parent);
        if self.len(parent) <= min_len {
            return Err(TreeError::BelowMinimum {
                ty: self.type_name(parent).to_string(),
                min_len,
            });
        }

        trace!(parent = %parent, index, child = %child, "remove");
        if let Content::Variable(children) = &mut self.nodes[parent.index()].content {
            children.remove(index);
        }
        self.nodes[child.index()].parent = None;
        Ok(child)
    }

    /// Reorder a child of a variable node. The length never changes, so
    /// the minimum is not consulted.
    pub fn move_child(&mut self, parent: NodeId, from: usize, to: usize) -> TreeResult<()> {
        if self.shape(parent) != Shape::Variable {
            return Err(TreeError::NotVariable(self.type_name(parent).to_string()));
        }
        let len = self.len(parent);
        if from >= len || to >= len {
            return Err(TreeError::IndexOutOfRange {
                index: from.max(to),
                len,
            });
        }

        trace!(parent = %parent, from, to, "move");
        if let Content::Variable(children) = &mut self.nodes[parent.index()].content {
            let child = children.remove(from);
            children.insert(to, child);
        }
        Ok(())
    }

    /// Overwrite a leaf's value, returning the previous one
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> TreeResult<String> {
        let value = value.into();
        let desc = self.descriptor(id);
        let pattern = desc
            .pattern()
            .ok_or_else(|| TreeError::NotLiteral(desc.name.clone()))?;
        if !pattern.matches(&value) {
            return Err(TreeError::InvalidLiteral {
                ty: desc.name.clone(),
                value,
            });
        }

        match &mut self.nodes[id.index()].content {
            Content::Leaf(current) => Ok(std::mem::replace(current, value)),
            _ => Err(TreeError::NotLiteral(self.type_name(id).to_string())),
        }
    }

    /// Reflexive: a node is its own ancestor
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Preorder walk of a subtree, starting with `id` itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    // Placeholders

    pub fn mark_placeholder(&mut self, id: NodeId) {
        if !self.placeholders.contains(&id) {
            self.placeholders.push(id);
        }
    }

    pub fn unmark_placeholder(&mut self, id: NodeId) -> bool {
        match self.placeholders.iter().position(|&p| p == id) {
            Some(pos) => {
                self.placeholders.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_placeholder(&self, id: NodeId) -> bool {
        self.placeholders.contains(&id)
    }

    /// Placeholders in the order they were recorded, attached or not
    pub fn placeholders(&self) -> &[NodeId] {
        &self.placeholders
    }
}

/// Preorder iterator returned by [`Tree::descendants`]
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_grammar::{compile_language, LanguageConfig};

    fn table() -> Arc<TypeTable> {
        let config = LanguageConfig::new("test")
            .rule("Expression", "?")
            .rule("Number(Expression)", "/[0-9]+/")
            .rule("Name(Expression)", "/[a-z]+/")
            .rule("Word", "/[a-z]+/")
            .rule("List", "Expression*")
            .rule("Pair", "left:Expression right:Expression")
            .rule("NonEmpty", "Number+");
        Arc::new(compile_language(&config).unwrap())
    }

    #[test]
    fn test_insert_and_remove() {
        let mut tree = Tree::new(table());
        let list = tree.variable(tree.lookup("List").unwrap(), vec![]).unwrap();
        let one = tree.literal(tree.lookup("Number").unwrap(), "1").unwrap();
        let two = tree.literal(tree.lookup("Name").unwrap(), "x").unwrap();

        tree.push(list, one).unwrap();
        tree.insert_at(list, 0, two).unwrap();
        assert_eq!(tree.children(list), &[two, one]);
        assert_eq!(tree.parent(one), Some(list));
        assert_eq!(tree.index_of(list, one), Some(1));

        let removed = tree.remove_at(list, 0).unwrap();
        assert_eq!(removed, two);
        assert_eq!(tree.parent(two), None);
        assert_eq!(tree.children(list), &[one]);
    }

    #[test]
    fn test_insert_type_mismatch() {
        let mut tree = Tree::new(table());
        let list = tree.variable(tree.lookup("List").unwrap(), vec![]).unwrap();
        let word = tree.literal(tree.lookup("Word").unwrap(), "abc").unwrap();

        let err = tree.insert_at(list, 0, word).unwrap_err();
        assert_eq!(
            err,
            TreeError::TypeMismatch {
                expected: "Expression".to_string(),
                found: "Word".to_string(),
            }
        );
        assert_eq!(tree.len(list), 0);
    }

    #[test]
    fn test_replace_fixed_slot() {
        let mut tree = Tree::new(table());
        let number = tree.lookup("Number").unwrap();
        let pair = tree
            .fixed(tree.lookup("Pair").unwrap(), vec!["1".into(), "2".into()])
            .unwrap_err();
        // Text cannot be cast into an abstract slot
        assert!(matches!(pair, TreeError::Cast { .. }));

        let a = tree.literal(number, "1").unwrap();
        let b = tree.literal(number, "2").unwrap();
        let pair = tree
            .fixed(tree.lookup("Pair").unwrap(), vec![a.into(), b.into()])
            .unwrap();

        let c = tree.literal(tree.lookup("Name").unwrap(), "c").unwrap();
        let old = tree.replace(pair, 1, c).unwrap();
        assert_eq!(old, b);
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.get(pair, 1).unwrap(), c);

        assert!(tree.insert_at(pair, 0, b).is_err());
        assert!(tree.remove_at(pair, 0).is_err());
    }

    #[test]
    fn test_attach_rules() {
        let mut tree = Tree::new(table());
        let list_ty = tree.lookup("List").unwrap();
        let outer = tree.variable(list_ty, vec![]).unwrap();
        let one = tree.literal(tree.lookup("Number").unwrap(), "1").unwrap();
        tree.push(outer, one).unwrap();

        let other = tree.variable(list_ty, vec![]).unwrap();
        assert_eq!(tree.push(other, one), Err(TreeError::AlreadyAttached));
    }

    #[test]
    fn test_minimum_length() {
        let mut tree = Tree::new(table());
        let ty = tree.lookup("NonEmpty").unwrap();
        // Number has no default, so neither does NonEmpty
        assert!(matches!(tree.instantiate(ty), Err(TreeError::NoDefault(_))));

        let one = tree.literal(tree.lookup("Number").unwrap(), "1").unwrap();
        let list = tree.variable(ty, vec![one.into()]).unwrap();
        assert_eq!(tree.len(list), 1);
        assert!(matches!(
            tree.remove_at(list, 0),
            Err(TreeError::BelowMinimum { min_len: 1, .. })
        ));
    }

    #[test]
    fn test_move_child_ignores_minimum() {
        let mut tree = Tree::new(table());
        let list = tree
            .variable(tree.lookup("NonEmpty").unwrap(), vec!["1".into(), "2".into()])
            .unwrap();
        let first = tree.get(list, 0).unwrap();

        tree.move_child(list, 0, 1).unwrap();
        assert_eq!(tree.get(list, 1).unwrap(), first);
        assert_eq!(tree.len(list), 2);
        assert!(tree.move_child(list, 0, 2).is_err());
    }

    #[test]
    fn test_set_value() {
        let mut tree = Tree::new(table());
        let number = tree.literal(tree.lookup("Number").unwrap(), "1").unwrap();

        assert_eq!(tree.set_value(number, "42").unwrap(), "1");
        assert_eq!(tree.value(number), Some("42"));
        assert!(matches!(
            tree.set_value(number, "abc"),
            Err(TreeError::InvalidLiteral { .. })
        ));
        assert_eq!(tree.value(number), Some("42"));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = Tree::new(table());
        let number = tree.lookup("Number").unwrap();
        let a = tree.literal(number, "1").unwrap();
        let b = tree.literal(number, "2").unwrap();
        let pair = tree
            .fixed(tree.lookup("Pair").unwrap(), vec![a.into(), b.into()])
            .unwrap();
        let list = tree
            .variable(tree.lookup("List").unwrap(), vec![pair.into()])
            .unwrap_err();
        // Pair is not an Expression
        assert!(matches!(list, TreeError::Cast { .. }));

        let list = tree.variable(tree.lookup("List").unwrap(), vec![]).unwrap();
        let c = tree.literal(number, "3").unwrap();
        tree.push(list, c).unwrap();

        assert_eq!(tree.descendants(pair).collect::<Vec<_>>(), vec![pair, a, b]);
        assert_eq!(tree.root_of(b), pair);
        assert!(tree.is_ancestor(pair, b));
        assert!(!tree.is_ancestor(b, pair));
        assert!(!tree.is_ancestor(list, b));
    }

    #[test]
    fn test_placeholders() {
        let mut tree = Tree::new(table());
        let a = tree.literal(tree.lookup("Number").unwrap(), "1").unwrap();

        tree.mark_placeholder(a);
        tree.mark_placeholder(a);
        assert_eq!(tree.placeholders(), &[a]);
        assert!(tree.is_placeholder(a));
        assert!(tree.unmark_placeholder(a));
        assert!(!tree.unmark_placeholder(a));
    }
}
