//! Save slot identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of save slots offered by the game.
pub const DEFAULT_SLOT_COUNT: u8 = 3;

/// Errors raised when turning user input into a [`SlotIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotIndexError {
    /// Index outside `1..=slot_count`.
    #[error("slot {index} is out of range (1..={slot_count})")]
    OutOfRange {
        /// Rejected index.
        index: u32,
        /// Number of slots configured.
        slot_count: u8,
    },
    /// Text that is not a number.
    #[error("invalid slot number: {0:?}")]
    Unparsable(String),
}

/// One-based index of a save slot.
///
/// Slot indices are stable identities: slot 2 is always slot 2, whether or
/// not anything has been saved into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// The first slot; the fallback target when nothing is active.
    pub const FIRST: Self = Self(1);

    /// Validate `index` against the configured number of slots.
    pub fn new(index: u32, slot_count: u8) -> Result<Self, SlotIndexError> {
        if index == 0 || index > u32::from(slot_count) {
            return Err(SlotIndexError::OutOfRange { index, slot_count });
        }
        Ok(Self(index as u8))
    }

    /// Parse a slot number typed by the player.
    pub fn parse(text: &str, slot_count: u8) -> Result<Self, SlotIndexError> {
        let index = u32::from_str(text.trim())
            .map_err(|_| SlotIndexError::Unparsable(text.to_string()))?;
        Self::new(index, slot_count)
    }

    /// All slot indices `1..=slot_count` in order.
    pub fn all(slot_count: u8) -> impl Iterator<Item = SlotIndex> {
        (1..=slot_count).map(SlotIndex)
    }

    /// Raw one-based value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns true if this index is valid for `slot_count` slots.
    pub fn fits(self, slot_count: u8) -> bool {
        self.0 >= 1 && self.0 <= slot_count
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
