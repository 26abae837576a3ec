use super::{load_document, OutputArgs};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// JSON file to render
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Parse a file and render it back through the language templates
pub fn render(args: RenderArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let title = args.input.display().to_string();
    args.output.emit(&title, &document.tree, document.root, None)
}
