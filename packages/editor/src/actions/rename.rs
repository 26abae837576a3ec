use crate::action::{applied, ensure_available, Action, Workspace};
use crate::errors::EditorResult;
use arbor_tree::NodeId;

#[derive(Debug, Clone)]
struct Renamed {
    node: NodeId,
    previous: String,
    was_placeholder: bool,
}

/// Replace the value of a literal.
///
/// The text is first filtered through the type's alphabet. If nothing
/// acceptable is left, or the result does not match the literal's pattern,
/// the previous value is kept and a placeholder stays unfilled.
#[derive(Debug, Clone)]
pub struct Rename {
    text: String,
    renamed: Option<Renamed>,
}

impl Rename {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            renamed: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Action for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn alters(&self) -> bool {
        true
    }

    fn is_available(&self, workspace: &Workspace, selected: NodeId) -> bool {
        workspace.tree.value(selected).is_some()
    }

    fn execute(&mut self, workspace: &mut Workspace, selected: NodeId) -> EditorResult<NodeId> {
        ensure_available(self, workspace, selected)?;
        let tree = &mut workspace.tree;

        let desc = tree.descriptor(selected);
        let filtered = desc.meta.filter(&self.text);
        let accepted = !filtered.is_empty()
            && desc
                .pattern()
                .map_or(false, |pattern| pattern.matches(&filtered));
        let current = tree.value(selected).unwrap_or_default().to_string();
        let value = if accepted { filtered } else { current.clone() };

        // A placeholder counts as filled only once its value changes
        let was_placeholder = value != current && tree.unmark_placeholder(selected);
        let previous = tree.set_value(selected, value)?;
        self.renamed = Some(Renamed {
            node: selected,
            previous,
            was_placeholder,
        });
        Ok(selected)
    }

    fn rollback(&mut self, workspace: &mut Workspace, _selected: NodeId) -> EditorResult<NodeId> {
        let renamed = self.renamed.take();
        let Renamed {
            node,
            previous,
            was_placeholder,
        } = applied(self, renamed)?;

        workspace.tree.set_value(node, previous)?;
        if was_placeholder {
            workspace.tree.mark_placeholder(node);
        }
        Ok(node)
    }
}
