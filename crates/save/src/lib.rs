#![warn(missing_docs)]
//! Durable save slots for holdfast.
//!
//! A [`Storage`] value names the save directory. [`SaveManager`] is the
//! entry point gameplay code uses: it resolves which slot to act on, keeps
//! the [`SlotRegistry`] metadata in step with the per-slot payload
//! documents, and hands out write-through [`SlotSession`]s.
//!
//! Reads never fail: a missing or corrupt document is replaced with
//! defaults and logged. Writes report [`SaveError`] so the caller can warn
//! the player.

mod document;
mod error;
mod legacy;
mod manager;
mod payload;
mod persist;
mod registry;
mod session;
mod storage;

pub use error::*;
pub use manager::*;
pub use payload::*;
pub use persist::*;
pub use registry::*;
pub use session::*;
pub use storage::*;
