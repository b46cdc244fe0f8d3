//! One-time import of the pre-slot single save file.

use holdfast_core::SlotIndex;
use tracing::info;

use crate::document::read_document;
use crate::{SaveError, SlotPayload, SlotRegistry};

impl SlotRegistry {
    /// Copy `save.json` into slot 1 if it exists and no slot has been used yet.
    ///
    /// Returns true if a migration happened. Safe to call repeatedly: once
    /// any slot exists this is a no-op. The legacy file is left in place.
    pub(crate) fn migrate_legacy(&mut self) -> Result<bool, SaveError> {
        if self.has_any_slot() {
            return Ok(false);
        }
        let legacy_path = self.storage().legacy_path();
        if !legacy_path.exists() {
            return Ok(false);
        }

        let payload = read_document::<SlotPayload>(&legacy_path).unwrap_or_default();
        let target = SlotIndex::FIRST;
        self.payloads().write_document(target, &payload)?;
        self.adopt_legacy(target)?;

        info!(
            from = %legacy_path.display(),
            items = payload.inventory.len(),
            "migrated legacy save into slot {target}"
        );
        Ok(true)
    }
}
