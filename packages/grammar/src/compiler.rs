//! # Grammar Compiler
//!
//! Compilation runs in two passes over the ordered rule table:
//!
//! 1. every declared name gets a descriptor (forward placeholder);
//! 2. parents and rules are resolved against the now complete table.
//!
//! A separate metadata pass ([`compile_language`]) then attaches defaults,
//! templates and the editor-facing tables from a [`LanguageConfig`].

use crate::config::LanguageConfig;
use crate::descriptor::{Metadata, Pattern, Rule, Slot, TypeId, TypeTable};
use crate::error::{GrammarError, GrammarResult};
use crate::template::Template;
use tracing::{debug, warn};

/// Split `name = rule` lines into ordered pairs.
///
/// Blank lines and lines starting with `#` are skipped. The rule is
/// everything after the first `=`, so literal patterns may contain `=`.
pub fn parse_rule_text(text: &str) -> GrammarResult<Vec<(String, String)>> {
    let mut rules = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (name, rule) = line
            .split_once('=')
            .ok_or_else(|| GrammarError::malformed(line))?;

        let (name, rule) = (name.trim(), rule.trim());
        if name.is_empty() || rule.is_empty() {
            return Err(GrammarError::malformed(line));
        }

        rules.push((name.to_string(), rule.to_string()));
    }

    Ok(rules)
}

/// Compile an ordered rule table into a [`TypeTable`].
///
/// Templates fall back to the plain forms (`{value}`, `{children}`, slots
/// separated by spaces) until [`compile_language`] attaches real ones.
pub fn compile<N, R>(rules: &[(N, R)]) -> GrammarResult<TypeTable>
where
    N: AsRef<str>,
    R: AsRef<str>,
{
    let mut table = TypeTable::new("");

    // Pass 1: forward declarations
    let mut pending = Vec::with_capacity(rules.len());
    for (declaration, rule) in rules {
        let (name, parent) = split_declaration(declaration.as_ref())?;
        if table.lookup(name).is_some() {
            return Err(GrammarError::DuplicateType(name.to_string()));
        }
        let id = table.declare(name);
        pending.push((id, parent, rule.as_ref().trim()));
    }

    // Pass 2: resolve parents and rules
    for (id, parent, rule_text) in pending {
        let name = table.name_of(id).to_string();

        let parent = match parent {
            Some(parent) => Some(
                table
                    .lookup(parent)
                    .ok_or_else(|| GrammarError::unresolved(parent, &name))?,
            ),
            None => None,
        };

        let rule = parse_rule(&table, &name, rule_text)?;
        let output = Template::compile(&rule.fallback_template(), |p| rule.placeholder(p))
            .map_err(|source| GrammarError::Template {
                ty: name.clone(),
                source,
            })?;

        let desc = table.get_mut(id);
        desc.parent = parent;
        desc.rule = rule;
        desc.meta = Metadata::bare(output);
    }

    check_inheritance(&table)?;

    debug!(types = table.len(), "Compiled grammar");
    Ok(table)
}

/// Compile the rules of `config`, then attach its per-type metadata.
pub fn compile_language(config: &LanguageConfig) -> GrammarResult<TypeTable> {
    let mut table = compile(&config.rules)?;
    table.set_name(config.name.clone());

    for name in config.referenced_types() {
        if table.lookup(name).is_none() {
            warn!(language = %config.name, ty = %name, "Metadata for unknown type ignored");
        }
    }

    let ids: Vec<TypeId> = table.iter().map(|desc| desc.id).collect();
    for id in ids {
        let meta = build_metadata(&table, id, config)?;
        table.get_mut(id).meta = meta;
    }

    debug!(language = %config.name, types = table.len(), "Attached language metadata");
    Ok(table)
}

fn build_metadata(table: &TypeTable, id: TypeId, config: &LanguageConfig) -> GrammarResult<Metadata> {
    let desc = table.get(id);
    let name = desc.name.as_str();
    let mut meta = desc.meta.clone();

    meta.default = config.defaults.get(name).cloned();

    // Presentation data only matters for types that can be instantiated
    if desc.is_abstract() {
        return Ok(meta);
    }

    let template = |source: &str| {
        Template::compile(source, |p| desc.rule.placeholder(p)).map_err(|source| {
            GrammarError::Template {
                ty: name.to_string(),
                source,
            }
        })
    };

    if let Some(source) = config.output_templates.get(name) {
        meta.output = template(source)?;
    }
    meta.display = match config.display_templates.get(name) {
        Some(source) => template(source)?,
        None => meta.output.clone(),
    };

    meta.hotkey = config.hotkeys.get(name).cloned();
    meta.style = config.styles.get(name).cloned();
    if let Some(delimiter) = config.delimiters.get(name) {
        meta.delimiter = delimiter.clone();
    }
    meta.indent = config.indents.get(name).cloned();
    meta.alphabet = config.alphabets.get(name).cloned();

    if let Some(escapes) = config.escapes.get(name) {
        let mut pairs = Vec::with_capacity(escapes.len());
        for (key, replacement) in escapes {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => pairs.push((c, replacement.clone())),
                _ => {
                    return Err(GrammarError::InvalidEscape {
                        ty: name.to_string(),
                        key: key.clone(),
                    })
                }
            }
        }
        pairs.sort();
        meta.escapes = pairs;
    }

    Ok(meta)
}

/// `name` or `name(parent)`
fn split_declaration(declaration: &str) -> GrammarResult<(&str, Option<&str>)> {
    let declaration = declaration.trim();

    let (name, parent) = match declaration.split_once('(') {
        Some((name, rest)) => {
            let parent = rest
                .strip_suffix(')')
                .ok_or_else(|| GrammarError::malformed(declaration))?;
            (name.trim(), Some(parent.trim()))
        }
        None => (declaration, None),
    };

    if !is_identifier(name) || !parent.map_or(true, is_identifier) {
        return Err(GrammarError::malformed(declaration));
    }

    Ok((name, parent))
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_rule(table: &TypeTable, name: &str, text: &str) -> GrammarResult<Rule> {
    let resolve = |reference: &str| {
        table
            .lookup(reference)
            .ok_or_else(|| GrammarError::unresolved(reference, name))
    };

    if text == "?" {
        return Ok(Rule::Abstract);
    }

    if let Some(rest) = text.strip_prefix('/') {
        let source = rest
            .strip_suffix('/')
            .ok_or_else(|| GrammarError::malformed(format!("{} = {}", name, text)))?;
        let pattern = Pattern::new(source).map_err(|source| GrammarError::InvalidPattern {
            ty: name.to_string(),
            source,
        })?;
        return Ok(Rule::Literal(pattern));
    }

    let repeated = match (text.strip_suffix('*'), text.strip_suffix('+')) {
        (Some(child), _) => Some((child.trim(), 0)),
        (_, Some(child)) => Some((child.trim(), 1)),
        _ => None,
    };
    if let Some((child, min_len)) = repeated {
        if !is_identifier(child) {
            return Err(GrammarError::malformed(format!("{} = {}", name, text)));
        }
        return Ok(Rule::Repeated {
            child: resolve(child)?,
            min_len,
        });
    }

    let mut slots = Vec::new();
    for token in text.split_whitespace() {
        let (label, ty_name) = match token.split_once(':') {
            Some((label, ty_name)) => (label.to_string(), ty_name),
            None => (token.to_lowercase(), token),
        };
        if !is_identifier(&label) || !is_identifier(ty_name) {
            return Err(GrammarError::malformed(format!("{} = {}", name, text)));
        }
        slots.push(Slot {
            label,
            ty: resolve(ty_name)?,
        });
    }

    if slots.is_empty() {
        return Err(GrammarError::malformed(format!("{} = {}", name, text)));
    }

    Ok(Rule::Fixed(slots))
}

fn check_inheritance(table: &TypeTable) -> GrammarResult<()> {
    for desc in table.iter() {
        let mut current = desc.parent;
        let mut steps = 0;
        while let Some(id) = current {
            steps += 1;
            if id == desc.id || steps > table.len() {
                return Err(GrammarError::InheritanceCycle(desc.name.clone()));
            }
            current = table.get(id).parent;
        }
    }
    Ok(())
}
