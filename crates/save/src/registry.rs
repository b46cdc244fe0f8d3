//! Slot registry: which slots exist, their names, and which one is active.
//!
//! The registry is a single document (`saves/meta.json`) kept separate from
//! the payloads so the slot menu can be drawn without decoding any game
//! state. Every lifecycle change rewrites it immediately.

use holdfast_core::{SlotIndex, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::document::{read_document, remove_document, write_document};
use crate::{PayloadStore, SaveError, SlotPayload, Storage};

/// Name given to the slot created from a legacy single save.
pub const LEGACY_SLOT_NAME: &str = "Legacy";

/// Display information for one save slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMetadata {
    /// Stable slot identity.
    pub index: SlotIndex,
    /// Player-chosen label; empty when the slot is unused.
    pub name: String,
    /// Whether a payload has been written.
    pub exists: bool,
    /// Last time the slot was created, selected or saved.
    pub last_played: Option<Timestamp>,
}

impl SlotMetadata {
    /// Metadata of an unused slot.
    pub fn empty(index: SlotIndex) -> Self {
        Self {
            index,
            name: String::new(),
            exists: false,
            last_played: None,
        }
    }

    /// Label for slot menus.
    pub fn display_name(&self) -> String {
        if !self.exists {
            "Empty".to_string()
        } else if self.name.is_empty() {
            format!("Slot {}", self.index)
        } else {
            self.name.clone()
        }
    }
}

/// Serialized form of [`SlotMetadata`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SlotRecord {
    name: String,
    exists: bool,
    #[serde(deserialize_with = "lenient_timestamp")]
    last_played: Option<Timestamp>,
}

/// Serialized registry: `{"slots": {"1": {...}, ...}, "active_slot": 1}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RegistryDocument {
    slots: BTreeMap<u8, SlotRecord>,
    active_slot: Option<u8>,
}

// An unparsable stamp decodes as None.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|text| match text.parse::<Timestamp>() {
        Ok(stamp) => Some(stamp),
        Err(err) => {
            warn!(last_played = %text, "ignoring unparsable timestamp: {err}");
            None
        }
    }))
}

/// In-memory registry state; always has one entry per configured slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryState {
    slots: Vec<SlotMetadata>,
    active: Option<SlotIndex>,
}

impl RegistryState {
    /// All slots empty, nothing active.
    pub fn fresh(storage: &Storage) -> Self {
        Self {
            slots: storage.slots().map(SlotMetadata::empty).collect(),
            active: None,
        }
    }

    fn from_document(storage: &Storage, doc: RegistryDocument) -> Self {
        let mut state = Self::fresh(storage);
        for (raw, record) in doc.slots {
            let Ok(index) = storage.slot(u32::from(raw)) else {
                warn!(slot = raw, "ignoring registry entry for unknown slot");
                continue;
            };
            let meta = state.meta_mut(index);
            meta.exists = record.exists;
            if record.exists {
                meta.name = record.name;
                meta.last_played = record.last_played;
            }
        }

        state.active = doc
            .active_slot
            .and_then(|raw| storage.slot(u32::from(raw)).ok())
            .filter(|index| state.meta(*index).exists);
        if doc.active_slot.is_some() && state.active.is_none() {
            warn!(
                active_slot = ?doc.active_slot,
                "active slot does not exist; clearing selection"
            );
        }
        state
    }

    fn to_document(&self) -> RegistryDocument {
        RegistryDocument {
            slots: self
                .slots
                .iter()
                .map(|meta| {
                    (
                        meta.index.get(),
                        SlotRecord {
                            name: meta.name.clone(),
                            exists: meta.exists,
                            last_played: meta.last_played,
                        },
                    )
                })
                .collect(),
            active_slot: self.active.map(SlotIndex::get),
        }
    }

    /// Metadata for every slot in index order.
    pub fn slots(&self) -> &[SlotMetadata] {
        &self.slots
    }

    /// Currently selected slot.
    pub fn active(&self) -> Option<SlotIndex> {
        self.active
    }

    // Indices are validated against the storage before they reach here.
    fn meta(&self, index: SlotIndex) -> &SlotMetadata {
        &self.slots[usize::from(index.get()) - 1]
    }

    fn meta_mut(&mut self, index: SlotIndex) -> &mut SlotMetadata {
        &mut self.slots[usize::from(index.get()) - 1]
    }

    fn any_exists(&self) -> bool {
        self.slots.iter().any(|meta| meta.exists)
    }
}

/// Owner of the registry document and arbiter of slot existence.
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    storage: Storage,
    payloads: PayloadStore,
    state: RegistryState,
    migration_checked: bool,
}

impl SlotRegistry {
    /// Load the registry, falling back to all-empty if it is missing or corrupt.
    pub fn open(storage: Storage) -> Self {
        let state = load_state(&storage);
        Self {
            payloads: PayloadStore::new(storage.clone()),
            storage,
            state,
            migration_checked: false,
        }
    }

    /// Storage this registry manages.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Snapshot of the registry without triggering migration.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Every slot in index order. Imports a legacy save first if one is waiting.
    pub fn list_slots(&mut self) -> Vec<SlotMetadata> {
        self.ensure_migrated();
        self.state.slots.clone()
    }

    /// Metadata of one slot.
    pub fn slot(&self, index: SlotIndex) -> Option<&SlotMetadata> {
        self.storage.check(index).ok().map(|index| self.state.meta(index))
    }

    /// Returns true if a payload has been written for `index`.
    pub fn exists(&self, index: SlotIndex) -> bool {
        self.slot(index).is_some_and(|meta| meta.exists)
    }

    /// Currently selected slot.
    pub fn active_slot(&self) -> Option<SlotIndex> {
        self.state.active
    }

    /// Start a new game in `index`.
    ///
    /// Returns `Ok(false)` without touching anything if the slot is taken
    /// and `overwrite` is not set. A blank name becomes "Slot N".
    pub fn create_slot(
        &mut self,
        index: SlotIndex,
        name: &str,
        overwrite: bool,
    ) -> Result<bool, SaveError> {
        let index = self.storage.check(index)?;
        self.ensure_migrated();
        let existed = self.state.meta(index).exists;
        if existed && !overwrite {
            return Ok(false);
        }

        self.payloads.write_document(index, &SlotPayload::default())?;

        let name = match name.trim() {
            "" => format!("Slot {index}"),
            trimmed => trimmed.to_string(),
        };
        let mut next = self.state.clone();
        let meta = next.meta_mut(index);
        meta.name = name;
        meta.exists = true;
        meta.last_played = Some(holdfast_core::now());
        next.active = Some(index);
        if let Err(err) = self.commit(next) {
            if !existed {
                remove_document(&self.storage.slot_path(index)).ok();
            }
            return Err(err);
        }

        info!(slot = %index, name = %self.state.meta(index).name, overwrite, "created save slot");
        Ok(true)
    }

    /// Select an existing slot. Returns `Ok(false)` if the slot is unused.
    pub fn activate_slot(&mut self, index: SlotIndex) -> Result<bool, SaveError> {
        let index = self.storage.check(index)?;
        if !self.state.meta(index).exists {
            return Ok(false);
        }

        let mut next = self.state.clone();
        next.meta_mut(index).last_played = Some(holdfast_core::now());
        next.active = Some(index);
        self.commit(next)?;
        info!(slot = %index, "activated save slot");
        Ok(true)
    }

    /// Remove a slot's payload, then forget the slot. Deleting an unused
    /// slot is fine.
    pub fn delete_slot(&mut self, index: SlotIndex) -> Result<(), SaveError> {
        let index = self.storage.check(index)?;
        remove_document(&self.storage.slot_path(index))?;

        let mut next = self.state.clone();
        *next.meta_mut(index) = SlotMetadata::empty(index);
        if next.active == Some(index) {
            next.active = None;
        }
        self.commit(next)?;
        info!(slot = %index, "deleted save slot");
        Ok(())
    }

    /// Record that a payload was just written to `index`: the slot exists
    /// and is stamped. Selection is untouched.
    pub(crate) fn record_save(&mut self, index: SlotIndex) -> Result<(), SaveError> {
        let mut next = self.state.clone();
        let meta = next.meta_mut(index);
        meta.exists = true;
        meta.last_played = Some(holdfast_core::now());
        self.commit(next)
    }

    /// Make `index` active if nothing is selected.
    pub(crate) fn select_if_unset(&mut self, index: SlotIndex) -> Result<(), SaveError> {
        if self.state.active.is_some() || !self.state.meta(index).exists {
            return Ok(());
        }
        let mut next = self.state.clone();
        next.active = Some(index);
        self.commit(next)?;
        info!(slot = %index, "selected save slot by default");
        Ok(())
    }

    /// Import the legacy save once per process, if it applies.
    pub(crate) fn ensure_migrated(&mut self) {
        if self.migration_checked {
            return;
        }
        match self.migrate_legacy() {
            Ok(_) => self.migration_checked = true,
            // Left unchecked so the next registry read retries.
            Err(err) => warn!("Legacy save migration failed: {err}"),
        }
    }

    pub(crate) fn has_any_slot(&self) -> bool {
        self.state.any_exists()
    }

    pub(crate) fn payloads(&self) -> &PayloadStore {
        &self.payloads
    }

    /// Mark `index` as the imported legacy slot and select it.
    pub(crate) fn adopt_legacy(&mut self, index: SlotIndex) -> Result<(), SaveError> {
        let mut next = self.state.clone();
        let meta = next.meta_mut(index);
        meta.name = LEGACY_SLOT_NAME.to_string();
        meta.exists = true;
        meta.last_played = Some(holdfast_core::now());
        next.active = Some(index);
        self.commit(next)
    }

    // Memory only follows once the document is on disk.
    fn commit(&mut self, next: RegistryState) -> Result<(), SaveError> {
        write_document(&self.storage.meta_path(), &next.to_document())?;
        self.state = next;
        Ok(())
    }
}

fn load_state(storage: &Storage) -> RegistryState {
    match read_document::<RegistryDocument>(&storage.meta_path()) {
        Some(doc) => RegistryState::from_document(storage, doc),
        None => RegistryState::fresh(storage),
    }
}
