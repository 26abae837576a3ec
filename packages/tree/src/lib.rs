//! # Arbor Tree
//!
//! Runtime syntax trees typed by an [`arbor_grammar::TypeTable`].
//!
//! ## Storage
//!
//! ```text
//! Tree ── nodes: [NodeData; n]        NodeId = index into the arena
//!           │
//!           ├─ ty: TypeId             descriptor of the node kind
//!           ├─ parent: Option<NodeId> navigation only, never ownership
//!           └─ content: Leaf(value) | Fixed([NodeId]) | Variable([NodeId])
//! ```
//!
//! Every insertion is checked against the type expected at that position,
//! so a tree built and edited through this API always renders to a valid
//! member of its grammar. Nodes removed from the tree stay in the arena
//! (detached) so that undo can put them back.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbor_tree::{Language, Renderer};
//!
//! let language = Language::compile(&config)?;
//! let mut tree = language.new_tree();
//! let assignment = tree.lookup("Assignment")?;
//! let node = tree.instantiate(assignment)?;
//! println!("{}", Renderer::new(&tree).render_plain(node));
//! ```

mod cast;
mod document;
mod error;
mod language;
mod node;
mod render;
mod tree;

pub use cast::Part;
pub use document::Document;
pub use error::{TreeError, TreeResult};
pub use language::Language;
pub use node::{NodeId, NodeRef};
pub use render::{Identity, Renderer, Surface, Wrapper};
pub use tree::{Descendants, Tree};

// Re-export grammar types for convenience
pub use arbor_grammar::{RawNode, Shape, TypeId, TypeTable};
