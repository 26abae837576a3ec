//! Textual editing commands, one per argument:
//!
//! ```text
//! parent child next prev next-placeholder
//! insert:<Type> insert-before:<Type> rename:<text>
//! delete cut copy paste paste-before up down undo redo
//! ```
//!
//! `<Type>` is a type name or a hotkey.

use anyhow::{anyhow, bail, Result};
use arbor_editor::actions::{
    Copy, Cut, Delete, Insert, Move, NextPlaceholder, Paste, Rename, SelectChild,
    SelectNextSibling, SelectParent, SelectPrevSibling,
};
use arbor_editor::Action;
use arbor_tree::{TypeId, TypeTable};

#[derive(Debug)]
pub enum Step {
    Run(Box<dyn Action>),
    Undo,
    Redo,
}

pub fn parse_step(command: &str, table: &TypeTable) -> Result<Step> {
    if let Some((verb, argument)) = command.split_once(':') {
        let step: Box<dyn Action> = match verb {
            "insert" => Box::new(Insert::new(resolve(argument, table)?)),
            "insert-before" => Box::new(Insert::before(resolve(argument, table)?)),
            "rename" => Box::new(Rename::new(argument)),
            _ => bail!("Unknown command `{}`", command),
        };
        return Ok(Step::Run(step));
    }

    let action: Box<dyn Action> = match command {
        "undo" => return Ok(Step::Undo),
        "redo" => return Ok(Step::Redo),
        "parent" => Box::new(SelectParent),
        "child" => Box::new(SelectChild),
        "next" => Box::new(SelectNextSibling),
        "prev" => Box::new(SelectPrevSibling),
        "next-placeholder" => Box::new(NextPlaceholder),
        "delete" => Box::new(Delete::new()),
        "cut" => Box::new(Cut::new()),
        "copy" => Box::new(Copy),
        "paste" => Box::new(Paste::new()),
        "paste-before" => Box::new(Paste::before()),
        "up" => Box::new(Move::up()),
        "down" => Box::new(Move::down()),
        _ => bail!("Unknown command `{}`", command),
    };
    Ok(Step::Run(action))
}

fn resolve(name: &str, table: &TypeTable) -> Result<TypeId> {
    table
        .lookup(name)
        .or_else(|| table.by_hotkey(name))
        .ok_or_else(|| anyhow!("Unknown type or hotkey `{}`", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language() -> arbor_tree::Language {
        arbor_json::language().unwrap()
    }

    #[test]
    fn test_parse_commands() {
        let language = language();
        let table = language.table();

        assert!(matches!(parse_step("undo", table).unwrap(), Step::Undo));
        assert!(matches!(parse_step("redo", table).unwrap(), Step::Redo));

        for (command, name) in [
            ("child", "select child"),
            ("next-placeholder", "next placeholder"),
            ("down", "move down"),
            ("insert:Null", "insert"),
            ("insert-before:n", "insert"),
            ("rename:a:b", "rename"),
        ] {
            match parse_step(command, table).unwrap() {
                Step::Run(action) => assert_eq!(action.name(), name, "{}", command),
                other => panic!("unexpected step {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_commands() {
        let language = language();
        assert!(parse_step("jump", language.table()).is_err());
        assert!(parse_step("insert:Nope", language.table()).is_err());
        assert!(parse_step("explode:x", language.table()).is_err());
    }
}
