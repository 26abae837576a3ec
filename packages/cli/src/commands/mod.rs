pub mod check;
pub mod edit;
pub mod render;
mod script;

pub use check::{check, CheckArgs};
pub use edit::{edit, EditArgs};
pub use render::{render, RenderArgs};

use crate::html::{page, HtmlWrapper};
use anyhow::{anyhow, Context, Result};
use arbor_tree::{Document, Identity, NodeId, Renderer, Surface, Tree};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Output options shared by `render` and `edit`
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Emit HTML with one link per node
    #[arg(long)]
    pub html: bool,

    /// Use display templates instead of output templates
    #[arg(long)]
    pub display: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    fn surface(&self) -> Surface {
        if self.display {
            Surface::Display
        } else {
            Surface::Output
        }
    }

    /// Render `root` and deliver it to stdout or the output file
    pub fn emit(
        &self,
        title: &str,
        tree: &Tree,
        root: NodeId,
        selected: Option<NodeId>,
    ) -> Result<()> {
        let renderer = Renderer::new(tree).surface(self.surface());
        let text = if self.html {
            let mut wrapper = HtmlWrapper::new(selected);
            let body = renderer.render(root, &mut wrapper);
            tracing::debug!(links = wrapper.links(), "Rendered HTML");
            page(title, &body)
        } else {
            let mut text = renderer.render(root, &mut Identity);
            text.push('\n');
            text
        };

        match &self.output {
            Some(path) => {
                fs::write(path, text).with_context(|| format!("Cannot write {}", path.display()))
            }
            None => {
                print!("{}", text);
                Ok(())
            }
        }
    }
}

/// Read and parse a JSON input file
pub fn load_document(path: &Path) -> Result<Document> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    arbor_json::parse(&source)
        .map_err(|err| anyhow!(arbor_json::format_error(&source, &path.to_string_lossy(), &err)))
}
