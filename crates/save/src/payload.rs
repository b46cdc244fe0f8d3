//! The per-slot game-state document.

use holdfast_core::ItemId;
use holdfast_world::{BaseLayout, Inventory, RaidState};
use serde::{Deserialize, Serialize};

/// Everything persisted for one save slot.
///
/// Keys missing from an older document are filled with defaults on load, so
/// a decoded payload is always complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotPayload {
    /// Flat item list; one entry per item, order not significant.
    pub inventory: Vec<ItemId>,
    /// Home base layout.
    pub base: BaseLayout,
    /// Raid progress.
    pub raid: RaidState,
}

impl SlotPayload {
    /// Stack the flat inventory for gameplay.
    pub fn stacked_inventory(&self) -> Inventory {
        Inventory::from_flat(&self.inventory)
    }

    /// Replace the flat inventory with the contents of `inventory`.
    pub fn set_inventory(&mut self, inventory: &Inventory) {
        self.inventory = inventory.to_flat();
    }
}
