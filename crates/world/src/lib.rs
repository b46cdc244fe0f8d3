#![warn(missing_docs)]
//! Gameplay state owned by a save slot: the stacked inventory, crafting,
//! the base layout and the raid state.
//!
//! Nothing in this crate touches the filesystem; `holdfast-save` flattens
//! these types into slot documents.

mod base;
mod crafting;
mod error;
mod inventory;
mod raid;

pub use base::*;
pub use crafting::*;
pub use error::*;
pub use inventory::*;
pub use raid::*;
