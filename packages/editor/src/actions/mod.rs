//! Concrete actions.
//!
//! | Action             | Alters tree | Available when                                  |
//! |--------------------|-------------|-------------------------------------------------|
//! | `SelectParent`     | no          | the selection has a parent                      |
//! | `SelectChild`      | no          | the selection has children                      |
//! | `SelectNextSibling`/`SelectPrevSibling` | no | a sibling exists in that direction |
//! | `Select`           | no          | the node is attached to the document            |
//! | `NextPlaceholder`  | no          | another placeholder is attached                 |
//! | `Insert`           | yes         | the target position accepts the type            |
//! | `Paste`            | yes         | the target position accepts the clipboard       |
//! | `Delete` / `Cut`   | yes         | the parent is a list above its minimum length   |
//! | `Copy`             | no          | always                                          |
//! | `Move`             | yes         | a list sibling exists in that direction         |
//! | `Rename`           | yes         | the selection is a literal                      |

mod clipboard;
mod delete;
mod insert;
mod navigate;
mod rename;
mod reorder;

pub use clipboard::{Copy, Cut, Paste};
pub use delete::Delete;
pub use insert::Insert;
pub use navigate::{
    NextPlaceholder, Select, SelectChild, SelectNextSibling, SelectParent, SelectPrevSibling,
};
pub use rename::Rename;
pub use reorder::{Direction, Move};
