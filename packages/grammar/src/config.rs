use crate::error::GrammarResult;
use crate::raw::RawNode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Declarative description of a language: its composition rules plus the
/// per-type tables consumed by the metadata pass.
///
/// ```json
/// {
///   "name": "calc",
///   "rules": [["Expression", "?"], ["Number(Expression)", "/[0-9]+/"]],
///   "defaults": { "Number": "0" },
///   "outputTemplates": { "Number": "{value}" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    pub name: String,

    /// Ordered `[name, rule]` pairs
    #[serde(default)]
    pub rules: Vec<(String, String)>,

    #[serde(default)]
    pub defaults: HashMap<String, RawNode>,

    #[serde(default)]
    pub hotkeys: HashMap<String, String>,

    #[serde(default)]
    pub styles: HashMap<String, String>,

    #[serde(default)]
    pub output_templates: HashMap<String, String>,

    #[serde(default)]
    pub display_templates: HashMap<String, String>,

    #[serde(default)]
    pub delimiters: HashMap<String, String>,

    #[serde(default)]
    pub indents: HashMap<String, String>,

    /// Per type: single character -> replacement
    #[serde(default)]
    pub escapes: HashMap<String, HashMap<String, String>>,

    #[serde(default)]
    pub alphabets: HashMap<String, String>,
}

impl LanguageConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> GrammarResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a language description from disk
    pub fn load(path: impl AsRef<Path>) -> GrammarResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Append rules written one per line as `name(parent) = rule`
    pub fn with_rule_text(mut self, text: &str) -> GrammarResult<Self> {
        self.rules.extend(crate::compiler::parse_rule_text(text)?);
        Ok(self)
    }

    pub fn rule(mut self, name: &str, rule: &str) -> Self {
        self.rules.push((name.to_string(), rule.to_string()));
        self
    }

    pub fn default_node(mut self, ty: &str, raw: impl Into<RawNode>) -> Self {
        self.defaults.insert(ty.to_string(), raw.into());
        self
    }

    pub fn hotkey(mut self, ty: &str, hotkey: &str) -> Self {
        self.hotkeys.insert(ty.to_string(), hotkey.to_string());
        self
    }

    pub fn style(mut self, ty: &str, style: &str) -> Self {
        self.styles.insert(ty.to_string(), style.to_string());
        self
    }

    pub fn output(mut self, ty: &str, template: &str) -> Self {
        self.output_templates.insert(ty.to_string(), template.to_string());
        self
    }

    pub fn display(mut self, ty: &str, template: &str) -> Self {
        self.display_templates.insert(ty.to_string(), template.to_string());
        self
    }

    pub fn delimiter(mut self, ty: &str, delimiter: &str) -> Self {
        self.delimiters.insert(ty.to_string(), delimiter.to_string());
        self
    }

    pub fn indent(mut self, ty: &str, indent: &str) -> Self {
        self.indents.insert(ty.to_string(), indent.to_string());
        self
    }

    pub fn escape(mut self, ty: &str, from: char, to: &str) -> Self {
        self.escapes
            .entry(ty.to_string())
            .or_default()
            .insert(from.to_string(), to.to_string());
        self
    }

    pub fn alphabet(mut self, ty: &str, alphabet: &str) -> Self {
        self.alphabets.insert(ty.to_string(), alphabet.to_string());
        self
    }

    /// Type names mentioned by any auxiliary table
    pub(crate) fn referenced_types(&self) -> impl Iterator<Item = &String> {
        self.defaults
            .keys()
            .chain(self.hotkeys.keys())
            .chain(self.styles.keys())
            .chain(self.output_templates.keys())
            .chain(self.display_templates.keys())
            .chain(self.delimiters.keys())
            .chain(self.indents.keys())
            .chain(self.escapes.keys())
            .chain(self.alphabets.keys())
    }
}
