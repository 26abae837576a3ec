//! End-to-end editing scenarios

use arbor_editor::actions::{Delete, Insert, Move, SelectChild};
use arbor_editor::{Document, Editor, EditorError};
use arbor_grammar::{LanguageConfig, RawNode};
use arbor_tree::Language;

fn language() -> Language {
    let config = LanguageConfig::new("lists")
        .rule("Expression", "?")
        .rule("Number(Expression)", "/[0-9]+/")
        .rule("Identifier(Expression)", "/[a-z]+/")
        .rule("Text", "/[a-z]*/")
        .rule("List", "Expression*")
        .rule("Numbers", "Number*")
        .rule("Texts", "Text*")
        .default_node("Number", "0")
        .default_node("Identifier", "x")
        .output("List", "[{children}]")
        .output("Numbers", "[{children}]")
        .output("Texts", "[{children}]");
    Language::compile(&config).unwrap()
}

fn document(language: &Language, raw: RawNode) -> Document {
    let mut tree = language.new_tree();
    let root = tree.graft(&raw).unwrap();
    Document::new(tree, root)
}

fn identifiers(names: &[&str]) -> RawNode {
    RawNode::node(
        "List",
        names
            .iter()
            .map(|name| RawNode::literal("Identifier", *name))
            .collect(),
    )
}

#[test]
fn test_move_down_and_undo() {
    let language = language();
    let mut editor = Editor::new(document(&language, identifiers(&["x", "y"])));

    let x = editor.execute(SelectChild).unwrap();
    assert_eq!(editor.tree().value(x), Some("x"));

    editor.execute(Move::down()).unwrap();
    assert_eq!(editor.render_text(), "[y, x]");
    assert_eq!(editor.selected(), x);

    editor.undo().unwrap();
    assert_eq!(editor.render_text(), "[x, y]");
    assert_eq!(editor.selected(), x);
}

#[test]
fn test_insert_into_empty_list() {
    let language = language();
    let mut editor = Editor::new(document(&language, RawNode::node("Numbers", vec![])));
    let number = language.table().lookup("Number").unwrap();

    let inserted = editor.execute(Insert::new(number)).unwrap();
    assert_eq!(editor.tree().len(editor.root()), 1);
    assert_eq!(editor.tree().parent(inserted), Some(editor.root()));
    assert_eq!(
        editor.tree().snapshot(inserted),
        RawNode::literal("Number", "0")
    );
    assert_eq!(editor.render_text(), "[0]");
}

#[test]
fn test_insert_wrong_child_type_unavailable() {
    let language = language();
    let mut editor = Editor::new(document(&language, RawNode::node("Texts", vec![])));
    let number = language.table().lookup("Number").unwrap();

    assert!(!editor.is_available(&Insert::new(number)));
    let err = editor.execute(Insert::new(number)).unwrap_err();
    assert_eq!(
        err,
        EditorError::PreconditionViolation {
            action: "insert".to_string()
        }
    );
    assert_eq!(editor.render_text(), "[]");
    assert!(!editor.can_undo());
}

#[test]
fn test_delete_only_child_and_undo() {
    let language = language();
    let mut editor = Editor::new(document(&language, identifiers(&["x"])));
    let root = editor.root();

    let x = editor.execute(SelectChild).unwrap();
    let selected = editor.execute(Delete::new()).unwrap();
    assert_eq!(selected, root);
    assert_eq!(editor.tree().len(root), 0);
    assert_eq!(editor.render_text(), "[]");

    let selected = editor.undo().unwrap();
    assert_eq!(selected, x);
    assert_eq!(editor.tree().len(root), 1);
    assert_eq!(editor.selected(), x);
}

#[test]
fn test_redo_replays_edit() {
    let language = language();
    let mut editor = Editor::new(document(&language, identifiers(&["a", "b", "c"])));

    editor.execute(SelectChild).unwrap();
    editor.execute(Delete::new()).unwrap();
    assert_eq!(editor.render_text(), "[b, c]");

    editor.undo().unwrap();
    assert_eq!(editor.render_text(), "[a, b, c]");

    let selected = editor.redo().unwrap();
    assert_eq!(editor.render_text(), "[b, c]");
    assert_eq!(editor.tree().value(selected), Some("b"));
    assert_eq!(editor.redo(), Err(EditorError::NothingToRedo));
}
