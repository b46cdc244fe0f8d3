//! Slot payload documents: the only code that reads or writes them.
//!
//! Partial updates are read-modify-write over the whole document, so two
//! updates to different fields of the same slot are last-write-wins at
//! document granularity. Callers serialize access through `&mut`.

use holdfast_core::{ItemId, SlotIndex};
use holdfast_world::{PlacedStructure, PlayerPosition, Weather};
use tracing::debug;

use crate::document::{read_document, write_document};
use crate::{SaveError, SlotPayload, SlotRegistry, Storage};

/// Reads and writes per-slot payload documents.
#[derive(Debug, Clone)]
pub struct PayloadStore {
    storage: Storage,
}

impl PayloadStore {
    /// Payload store over `storage`.
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Load a slot's payload, or the default payload if it is missing or corrupt.
    pub fn load_payload(&self, index: SlotIndex) -> SlotPayload {
        read_document(&self.storage.slot_path(index)).unwrap_or_default()
    }

    /// Write a payload and claim the slot in the registry.
    pub fn write_payload(
        &self,
        registry: &mut SlotRegistry,
        index: SlotIndex,
        payload: &SlotPayload,
    ) -> Result<(), SaveError> {
        let index = self.storage.check(index)?;
        self.write_document(index, payload)?;
        registry.record_save(index)
    }

    /// Replace the inventory of a slot.
    pub fn update_inventory(
        &self,
        registry: &mut SlotRegistry,
        index: SlotIndex,
        items: &[ItemId],
    ) -> Result<(), SaveError> {
        let mut payload = self.load_payload(index);
        payload.inventory = items.to_vec();
        debug!(slot = %index, items = items.len(), "saving inventory");
        self.write_payload(registry, index, &payload)
    }

    /// Overlay the given base fields onto a slot.
    pub fn update_base(
        &self,
        registry: &mut SlotRegistry,
        index: SlotIndex,
        player_position: Option<PlayerPosition>,
        structures: Option<&[PlacedStructure]>,
    ) -> Result<(), SaveError> {
        let mut payload = self.load_payload(index);
        if let Some(position) = player_position {
            payload.base.player_position = position;
        }
        if let Some(structures) = structures {
            payload.base.placed_structures = structures.to_vec();
        }
        self.write_payload(registry, index, &payload)
    }

    /// Overlay the given raid fields onto a slot. Noise is clamped.
    pub fn update_raid(
        &self,
        registry: &mut SlotRegistry,
        index: SlotIndex,
        noise: Option<i64>,
        weather: Option<Weather>,
    ) -> Result<(), SaveError> {
        let mut payload = self.load_payload(index);
        if let Some(noise) = noise {
            payload.raid.set_noise(noise);
        }
        if let Some(weather) = weather {
            payload.raid.weather = weather;
        }
        self.write_payload(registry, index, &payload)
    }

    /// Write the document only, without registry bookkeeping.
    pub(crate) fn write_document(
        &self,
        index: SlotIndex,
        payload: &SlotPayload,
    ) -> Result<(), SaveError> {
        write_document(&self.storage.slot_path(index), payload)
    }
}
