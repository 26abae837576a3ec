use crate::document::Document;
use crate::tree::Tree;
use arbor_grammar::{compile_language, GrammarError, GrammarResult, LanguageConfig, TypeTable};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A compiled language whose every default has been checked to build
#[derive(Debug, Clone)]
pub struct Language {
    table: Arc<TypeTable>,
}

impl Language {
    pub fn compile(config: &LanguageConfig) -> GrammarResult<Self> {
        let table = Arc::new(compile_language(config)?);
        validate_defaults(&table)?;
        Ok(Self { table })
    }

    pub fn from_json(json: &str) -> GrammarResult<Self> {
        Self::compile(&LanguageConfig::from_json(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> GrammarResult<Self> {
        Self::compile(&LanguageConfig::load(path)?)
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    pub fn new_tree(&self) -> Tree {
        Tree::new(Arc::clone(&self.table))
    }

    /// Document holding the default instance of `root_type`
    pub fn new_document(&self, root_type: &str) -> crate::TreeResult<Document> {
        let mut tree = self.new_tree();
        let ty = tree.lookup(root_type)?;
        let root = tree.instantiate(ty)?;
        Ok(Document::new(tree, root))
    }
}

/// Build every default once in a scratch tree
fn validate_defaults(table: &Arc<TypeTable>) -> GrammarResult<()> {
    let mut scratch = Tree::new(Arc::clone(table));
    let mut checked = 0;

    for desc in table.iter() {
        let result = if !desc.is_abstract() {
            scratch.instantiate(desc.id)
        } else if desc.meta.default.is_some() {
            scratch.default_of(desc.id)
        } else {
            continue;
        };

        result.map_err(|err| GrammarError::InvalidDefault {
            ty: desc.name.clone(),
            reason: err.to_string(),
        })?;
        checked += 1;
    }

    debug!(language = %table.name(), defaults = checked, "Validated defaults");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeError;
    use arbor_grammar::RawNode;

    #[test]
    fn test_abstract_type_is_never_built() {
        let config = LanguageConfig::new("scenario")
            .rule("a", "/.+/")
            .rule("b(a)", "?")
            .default_node("a", "x");
        let language = Language::compile(&config).unwrap();

        let table = language.table();
        let a = table.lookup("a").unwrap();
        let b = table.lookup("b").unwrap();
        assert!(table.extends(b, a));

        let mut tree = language.new_tree();
        assert_eq!(tree.instantiate(b), Err(TreeError::Abstract("b".to_string())));

        let x = tree.instantiate(a).unwrap();
        assert_eq!(tree.value(x), Some("x"));
    }

    #[test]
    fn test_invalid_default() {
        let config = LanguageConfig::new("bad")
            .rule("Number", "/[0-9]+/")
            .default_node("Number", "abc");
        let err = Language::compile(&config).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidDefault { ty, .. } if ty == "Number"));
    }

    #[test]
    fn test_missing_default() {
        let config = LanguageConfig::new("bad").rule("Number", "/[0-9]+/");
        assert!(Language::compile(&config).is_err());

        let config = LanguageConfig::new("ok").rule("Word", "/[a-z]*/");
        assert!(Language::compile(&config).is_ok());
    }

    #[test]
    fn test_abstract_default_names_subtype() {
        let config = LanguageConfig::new("expr")
            .rule("Expression", "?")
            .rule("Number(Expression)", "/[0-9]+/")
            .rule("Pair", "Expression Expression")
            .default_node("Number", "0")
            .default_node("Expression", RawNode::literal("Number", "0"));
        let language = Language::compile(&config).unwrap();

        let document = language.new_document("Pair").unwrap();
        assert_eq!(document.render_text(), "0 0");
    }
}
