use super::script::{parse_step, Step};
use super::{load_document, OutputArgs};
use anyhow::{Context, Result};
use arbor_editor::{Editor, EditorOptions, DEFAULT_MAX_LEVELS};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// JSON file to edit
    pub input: PathBuf,

    /// Editing commands, applied in order (see `parent`, `insert:<Type>`, `undo`, ...)
    #[arg(required = true)]
    pub commands: Vec<String>,

    /// Undo levels kept (0 = unlimited)
    #[arg(long, default_value_t = DEFAULT_MAX_LEVELS)]
    pub history: usize,

    /// Print each command and the selected node as it runs
    #[arg(long)]
    pub trace: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Replay a command script through an editor session and print the result
pub fn edit(args: EditArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let table = document.tree.table_handle();
    let mut editor = Editor::with_options(
        document,
        EditorOptions {
            max_history: args.history,
        },
    );

    for (index, command) in args.commands.iter().enumerate() {
        let step = parse_step(command, &table)?;
        let result = match step {
            Step::Run(action) => editor.execute_boxed(action),
            Step::Undo => editor.undo(),
            Step::Redo => editor.redo(),
        };
        let selected = result.with_context(|| format!("Command {} `{}` failed", index + 1, command))?;

        info!(command = %command, selected = %selected, "Applied command");
        if args.trace {
            let node = editor.tree().node(selected);
            eprintln!(
                "{} {:<20} {} {}",
                "→".cyan(),
                command,
                node.type_name().bold(),
                node.value().unwrap_or("")
            );
        }
    }

    let title = args.input.display().to_string();
    args.output
        .emit(&title, editor.tree(), editor.root(), Some(editor.selected()))
}
