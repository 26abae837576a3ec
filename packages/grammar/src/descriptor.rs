use crate::raw::RawNode;
use crate::template::Template;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Index of a descriptor inside its [`TypeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Anchored literal pattern; the whole value has to match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// One positional child of a fixed node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub label: String,
    pub ty: TypeId,
}

/// Formation rule of a node type
#[derive(Debug, Clone)]
pub enum Rule {
    /// Supertype only, never instantiated
    Abstract,
    /// Leaf holding a raw value
    Literal(Pattern),
    /// Homogeneous list of children
    Repeated { child: TypeId, min_len: usize },
    /// Exactly one child per slot
    Fixed(Vec<Slot>),
}

/// Storage shape of the nodes a rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Fixed,
    Variable,
}

impl Rule {
    pub fn is_abstract(&self) -> bool {
        matches!(self, Rule::Abstract)
    }

    pub fn shape(&self) -> Option<Shape> {
        match self {
            Rule::Abstract => None,
            Rule::Literal(_) => Some(Shape::Leaf),
            Rule::Repeated { .. } => Some(Shape::Variable),
            Rule::Fixed(_) => Some(Shape::Fixed),
        }
    }

    /// Resolve a template placeholder to the index of the part it names
    pub(crate) fn placeholder(&self, name: &str) -> Option<usize> {
        match self {
            Rule::Abstract => None,
            Rule::Literal(_) => matches!(name, "value" | "0").then_some(0),
            Rule::Repeated { .. } => matches!(name, "children" | "0").then_some(0),
            Rule::Fixed(slots) => match name.parse::<usize>() {
                Ok(index) => (index < slots.len()).then_some(index),
                Err(_) => slots.iter().position(|slot| slot.label == name),
            },
        }
    }

    /// Template used when the language gives none
    pub(crate) fn fallback_template(&self) -> String {
        match self {
            Rule::Abstract => String::new(),
            Rule::Literal(_) => "{value}".to_string(),
            Rule::Repeated { .. } => "{children}".to_string(),
            Rule::Fixed(slots) => (0..slots.len())
                .map(|i| format!("{{{}}}", i))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Per-type presentation data, attached by the metadata pass
#[derive(Debug, Clone)]
pub struct Metadata {
    /// Canonical minimal instance
    pub default: Option<RawNode>,
    pub output: Template,
    /// On-screen template, the output template unless overridden
    pub display: Template,
    pub hotkey: Option<String>,
    pub style: Option<String>,
    pub delimiter: String,
    /// Block layout for lists: one child per line, indented by this string
    pub indent: Option<String>,
    pub escapes: Vec<(char, String)>,
    /// Characters a renamed value may contain
    pub alphabet: Option<String>,
}

impl Metadata {
    pub(crate) fn bare(output: Template) -> Self {
        Self {
            default: None,
            display: output.clone(),
            output,
            hotkey: None,
            style: None,
            delimiter: ", ".to_string(),
            indent: None,
            escapes: Vec::new(),
            alphabet: None,
        }
    }

    /// Apply the escape table to a literal value
    pub fn escape(&self, value: &str) -> String {
        if self.escapes.is_empty() {
            return value.to_string();
        }

        let mut output = String::with_capacity(value.len());
        for c in value.chars() {
            match self.escapes.iter().find(|(from, _)| *from == c) {
                Some((_, replacement)) => output.push_str(replacement),
                None => output.push(c),
            }
        }
        output
    }

    /// Keep only the characters the alphabet accepts
    pub fn filter(&self, value: &str) -> String {
        match &self.alphabet {
            Some(alphabet) => value.chars().filter(|c| alphabet.contains(*c)).collect(),
            None => value.to_string(),
        }
    }
}

/// Compiled description of one node kind
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub id: TypeId,
    pub name: String,
    pub parent: Option<TypeId>,
    pub rule: Rule,
    pub meta: Metadata,
}

impl Descriptor {
    pub fn is_abstract(&self) -> bool {
        self.rule.is_abstract()
    }

    pub fn shape(&self) -> Option<Shape> {
        self.rule.shape()
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        match &self.rule {
            Rule::Literal(pattern) => Some(pattern),
            _ => None,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        match &self.rule {
            Rule::Fixed(slots) => slots,
            _ => &[],
        }
    }
}

/// All node types of one language, indexed by [`TypeId`]
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    name: String,
    types: Vec<Descriptor>,
    by_name: HashMap<String, TypeId>,
}

impl TypeTable {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub(crate) fn declare(&mut self, name: &str) -> TypeId {
        let id = TypeId::new(self.types.len());
        self.types.push(Descriptor {
            id,
            name: name.to_string(),
            parent: None,
            rule: Rule::Abstract,
            meta: Metadata::bare(Template::constant("")),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut Descriptor {
        &mut self.types[id.index()]
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Language name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, id: TypeId) -> &Descriptor {
        &self.types[id.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: TypeId) -> &str {
        &self.get(id).name
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.types.iter()
    }

    /// Reflexive-transitive walk along parent links
    pub fn extends(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut current = Some(ty);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).parent;
        }
        false
    }

    /// Concrete types that may stand where `expected` is required
    pub fn concrete_subtypes(&self, expected: TypeId) -> Vec<TypeId> {
        self.types
            .iter()
            .filter(|desc| !desc.is_abstract() && self.extends(desc.id, expected))
            .map(|desc| desc.id)
            .collect()
    }

    /// Concrete type bound to a hotkey
    pub fn by_hotkey(&self, hotkey: &str) -> Option<TypeId> {
        self.types
            .iter()
            .find(|desc| !desc.is_abstract() && desc.meta.hotkey.as_deref() == Some(hotkey))
            .map(|desc| desc.id)
    }
}

impl fmt::Display for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for desc in &self.types {
            write!(f, "{}", desc.name)?;
            if let Some(parent) = desc.parent {
                write!(f, "({})", self.name_of(parent))?;
            }
            write!(f, " = ")?;
            match &desc.rule {
                Rule::Abstract => write!(f, "?")?,
                Rule::Literal(pattern) => write!(f, "/{}/", pattern.source())?,
                Rule::Repeated { child, min_len } => {
                    let suffix = if *min_len > 0 { '+' } else { '*' };
                    write!(f, "{}{}", self.name_of(*child), suffix)?
                }
                Rule::Fixed(slots) => {
                    for (i, slot) in slots.iter().enumerate() {
                        if i > 0 {
                            write!(f, " ")?;
                        }
                        let ty = self.name_of(slot.ty);
                        if slot.label == ty.to_lowercase() {
                            write!(f, "{}", ty)?;
                        } else {
                            write!(f, "{}:{}", slot.label, ty)?;
                        }
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
