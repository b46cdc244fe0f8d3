//! On-disk layout of the save directory.

use holdfast_core::{SlotIndex, SlotIndexError, DEFAULT_SLOT_COUNT};
use std::path::{Path, PathBuf};

const SAVES_DIR: &str = "saves";
const META_FILE: &str = "meta.json";
const LEGACY_FILE: &str = "save.json";

/// Where save documents live and how many slots there are.
///
/// ```text
/// <root>/save.json                 legacy single save (read once, for migration)
/// <root>/saves/meta.json           slot registry
/// <root>/saves/save_slot{N}.json   payload of slot N
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    root: PathBuf,
    slot_count: u8,
}

impl Storage {
    /// Storage rooted at `root` with the default number of slots.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            slot_count: DEFAULT_SLOT_COUNT,
        }
    }

    /// Override the number of slots (at least one).
    pub fn with_slot_count(mut self, slot_count: u8) -> Self {
        self.slot_count = slot_count.max(1);
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of save slots.
    pub fn slot_count(&self) -> u8 {
        self.slot_count
    }

    /// Directory holding the registry and payload documents.
    pub fn saves_dir(&self) -> PathBuf {
        self.root.join(SAVES_DIR)
    }

    /// Registry document path.
    pub fn meta_path(&self) -> PathBuf {
        self.saves_dir().join(META_FILE)
    }

    /// Payload document path for `slot`.
    pub fn slot_path(&self, slot: SlotIndex) -> PathBuf {
        self.saves_dir().join(format!("save_slot{}.json", slot.get()))
    }

    /// Pre-slot single save document.
    pub fn legacy_path(&self) -> PathBuf {
        self.root.join(LEGACY_FILE)
    }

    /// Validate a raw slot number against this storage.
    pub fn slot(&self, index: u32) -> Result<SlotIndex, SlotIndexError> {
        SlotIndex::new(index, self.slot_count)
    }

    /// Check that an already-built index fits this storage.
    pub fn check(&self, slot: SlotIndex) -> Result<SlotIndex, SlotIndexError> {
        if slot.fits(self.slot_count) {
            Ok(slot)
        } else {
            Err(SlotIndexError::OutOfRange {
                index: u32::from(slot.get()),
                slot_count: self.slot_count,
            })
        }
    }

    /// Every slot index in order.
    pub fn slots(&self) -> impl Iterator<Item = SlotIndex> {
        SlotIndex::all(self.slot_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_save_directory_convention() {
        let storage = Storage::new("/games/holdfast");
        let slot = storage.slot(2).unwrap();
        assert_eq!(
            storage.slot_path(slot),
            PathBuf::from("/games/holdfast/saves/save_slot2.json")
        );
        assert_eq!(
            storage.meta_path(),
            PathBuf::from("/games/holdfast/saves/meta.json")
        );
        assert_eq!(
            storage.legacy_path(),
            PathBuf::from("/games/holdfast/save.json")
        );
    }

    #[test]
    fn slot_count_bounds_indices() {
        let storage = Storage::new(".").with_slot_count(2);
        assert!(storage.slot(3).is_err());
        assert_eq!(storage.slots().count(), 2);

        let wide = Storage::new(".").with_slot_count(5);
        let fifth = wide.slot(5).unwrap();
        assert!(storage.check(fifth).is_err());
        assert_eq!(Storage::new(".").with_slot_count(0).slot_count(), 1);
    }
}
