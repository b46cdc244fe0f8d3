//! Persistence facade used by gameplay code.

use holdfast_core::{ItemId, SlotIndex};
use holdfast_world::{PlacedStructure, PlayerPosition, Weather};
use tracing::info;

use crate::{
    PayloadStore, SaveError, SlotMetadata, SlotPayload, SlotRegistry, SlotSession, Storage,
};

/// Single entry point for slot lifecycle and game-state persistence.
///
/// Methods that take `slot: Option<SlotIndex>` act on the given slot, else
/// the active slot, else slot 1. Every save is written through before the
/// method returns; there is no buffering.
///
/// All mutation goes through `&mut self`, so one manager is one writer. Hosts
/// that share it across threads wrap it in a `Mutex`.
#[derive(Debug, Clone)]
pub struct SaveManager {
    registry: SlotRegistry,
    payloads: PayloadStore,
}

impl SaveManager {
    /// Open the save directory described by `storage`.
    pub fn open(storage: Storage) -> Self {
        info!(
            root = %storage.root().display(),
            slots = storage.slot_count(),
            "opening save directory"
        );
        Self {
            payloads: PayloadStore::new(storage.clone()),
            registry: SlotRegistry::open(storage),
        }
    }

    /// Storage layout in use.
    pub fn storage(&self) -> &Storage {
        self.registry.storage()
    }

    /// Slot registry (read-only view).
    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    /// Every slot in index order.
    pub fn list_slots(&mut self) -> Vec<SlotMetadata> {
        self.registry.list_slots()
    }

    /// Start a new game in `index`; see [`SlotRegistry::create_slot`].
    pub fn create_slot(
        &mut self,
        index: SlotIndex,
        name: &str,
        overwrite: bool,
    ) -> Result<bool, SaveError> {
        self.registry.create_slot(index, name, overwrite)
    }

    /// Select an existing slot.
    pub fn activate_slot(&mut self, index: SlotIndex) -> Result<bool, SaveError> {
        self.registry.activate_slot(index)
    }

    /// Currently selected slot.
    pub fn active_slot(&self) -> Option<SlotIndex> {
        self.registry.active_slot()
    }

    /// Delete a slot and its payload.
    pub fn delete_slot(&mut self, index: SlotIndex) -> Result<(), SaveError> {
        self.registry.delete_slot(index)
    }

    /// Which slot an operation on `slot` applies to.
    pub fn resolve_slot(&self, slot: Option<SlotIndex>) -> SlotIndex {
        slot.or(self.registry.active_slot()).unwrap_or(SlotIndex::FIRST)
    }

    /// Load a slot's full game state. Never fails; see [`PayloadStore::load_payload`].
    pub fn load(&mut self, slot: Option<SlotIndex>) -> SlotPayload {
        let (index, _) = self.target(slot);
        self.payloads.load_payload(index)
    }

    /// Replace a slot's full game state.
    pub fn save_payload(
        &mut self,
        payload: &SlotPayload,
        slot: Option<SlotIndex>,
    ) -> Result<(), SaveError> {
        let (index, fallback) = self.target(slot);
        self.payloads.write_payload(&mut self.registry, index, payload)?;
        self.claim_fallback(index, fallback)
    }

    /// Save the flat inventory list.
    pub fn save_inventory(
        &mut self,
        items: &[ItemId],
        slot: Option<SlotIndex>,
    ) -> Result<(), SaveError> {
        let (index, fallback) = self.target(slot);
        self.payloads.update_inventory(&mut self.registry, index, items)?;
        self.claim_fallback(index, fallback)
    }

    /// Save whichever base fields are given.
    pub fn save_base(
        &mut self,
        player_position: Option<PlayerPosition>,
        structures: Option<&[PlacedStructure]>,
        slot: Option<SlotIndex>,
    ) -> Result<(), SaveError> {
        let (index, fallback) = self.target(slot);
        self.payloads.update_base(&mut self.registry, index, player_position, structures)?;
        self.claim_fallback(index, fallback)
    }

    /// Save whichever raid fields are given.
    pub fn save_raid(
        &mut self,
        noise: Option<i64>,
        weather: Option<Weather>,
        slot: Option<SlotIndex>,
    ) -> Result<(), SaveError> {
        let (index, fallback) = self.target(slot);
        self.payloads.update_raid(&mut self.registry, index, noise, weather)?;
        self.claim_fallback(index, fallback)
    }

    /// Load a slot into a write-through gameplay session.
    ///
    /// The session borrows the manager mutably, so nothing else can write
    /// while it is alive.
    pub fn session(&mut self, slot: Option<SlotIndex>) -> SlotSession<'_> {
        let (index, _) = self.target(slot);
        SlotSession::open(self, slot, index)
    }

    // Pending legacy import runs before any slot is resolved. The flag is
    // set when neither an explicit nor an active slot was available.
    fn target(&mut self, slot: Option<SlotIndex>) -> (SlotIndex, bool) {
        self.registry.ensure_migrated();
        let fallback = slot.is_none() && self.registry.active_slot().is_none();
        (self.resolve_slot(slot), fallback)
    }

    fn claim_fallback(&mut self, index: SlotIndex, fallback: bool) -> Result<(), SaveError> {
        if fallback {
            self.registry.select_if_unset(index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn temp_storage() -> (TempDir, Storage) {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        (dir, storage)
    }

    #[test]
    fn resolution_prefers_explicit_then_active_then_first() {
        let (_dir, storage) = temp_storage();
        let mut saves = SaveManager::open(storage.clone());
        let second = storage.slot(2).unwrap();
        let third = storage.slot(3).unwrap();

        assert_eq!(saves.resolve_slot(None), SlotIndex::FIRST);
        saves.create_slot(second, "B", false).unwrap();
        assert_eq!(saves.resolve_slot(None), second);
        assert_eq!(saves.resolve_slot(Some(third)), third);
    }

    #[test]
    fn saving_with_nothing_active_claims_slot_one() {
        let (_dir, storage) = temp_storage();
        let mut saves = SaveManager::open(storage.clone());

        saves
            .save_inventory(&["Wood".to_string()], None)
            .unwrap();
        assert_eq!(saves.active_slot(), Some(SlotIndex::FIRST));
        assert!(saves.registry().exists(SlotIndex::FIRST));
        assert_eq!(saves.load(None).inventory, vec!["Wood"]);
    }

    #[test]
    fn saving_to_an_explicit_slot_leaves_selection_alone() {
        let (_dir, storage) = temp_storage();
        let mut saves = SaveManager::open(storage.clone());
        let second = storage.slot(2).unwrap();

        saves.save_raid(Some(10), None, Some(second)).unwrap();
        assert!(saves.registry().exists(second));
        assert_eq!(saves.active_slot(), None);

        // Nothing active, so an implicit load still falls back to slot 1.
        assert_eq!(saves.load(None), SlotPayload::default());
        assert_eq!(saves.load(Some(second)).raid.noise, 10);
    }

    #[test]
    fn partial_saves_only_touch_their_fields() {
        let (_dir, storage) = temp_storage();
        let mut saves = SaveManager::open(storage.clone());
        let slot = Some(storage.slot(1).unwrap());
        saves.create_slot(SlotIndex::FIRST, "A", false).unwrap();

        saves
            .save_inventory(&["Stone".to_string(), "Stone".to_string()], slot)
            .unwrap();
        saves
            .save_base(Some(PlayerPosition(5, 6)), None, slot)
            .unwrap();
        saves.save_raid(Some(250), None, slot).unwrap();
        saves.save_raid(None, Some(Weather::Rain), slot).unwrap();

        let payload = saves.load(slot);
        assert_eq!(payload.inventory.len(), 2);
        assert_eq!(payload.base.player_position, PlayerPosition(5, 6));
        assert_eq!(payload.raid.noise, holdfast_world::MAX_NOISE);
        assert_eq!(payload.raid.weather, Weather::Rain);
    }

    #[test]
    fn out_of_range_slot_is_rejected_on_write() {
        let (_dir, storage) = temp_storage();
        let mut saves = SaveManager::open(storage.clone().with_slot_count(2));
        let third = storage.slot(3).unwrap();

        let err = saves.save_raid(Some(1), None, Some(third)).unwrap_err();
        assert!(matches!(err, SaveError::Slot(_)));
        assert!(saves.create_slot(third, "C", false).is_err());
    }
}
