//! Write-through gameplay session over one slot.

use holdfast_core::SlotIndex;
use holdfast_world::{
    ActionError, BaseLayout, Inventory, PlayerPosition, RaidState, RecipeBook, StructureRect,
    Weather,
};
use tracing::debug;

use crate::{SaveManager, SessionError, SlotPayload};

/// In-memory state of one slot, flushed to disk after every action.
///
/// Refused actions leave both memory and disk unchanged. An action that
/// changed memory but could not be written returns [`SessionError::Save`];
/// the in-memory state keeps the change so the next successful write
/// catches the document up.
#[derive(Debug)]
pub struct SlotSession<'a> {
    saves: &'a mut SaveManager,
    // Slot as requested by the caller; `None` keeps the facade's fallback.
    requested: Option<SlotIndex>,
    slot: SlotIndex,
    inventory: Inventory,
    base: BaseLayout,
    raid: RaidState,
    recipes: RecipeBook,
}

impl<'a> SlotSession<'a> {
    pub(crate) fn open(
        saves: &'a mut SaveManager,
        requested: Option<SlotIndex>,
        slot: SlotIndex,
    ) -> Self {
        let payload = saves.load(Some(slot));
        debug!(slot = %slot, items = payload.inventory.len(), "session opened");
        Self {
            inventory: payload.stacked_inventory(),
            base: payload.base,
            raid: payload.raid,
            recipes: RecipeBook::with_defaults(),
            saves,
            requested,
            slot,
        }
    }

    /// Use a different recipe book for crafting and build costs.
    pub fn with_recipes(mut self, recipes: RecipeBook) -> Self {
        self.recipes = recipes;
        self
    }

    /// Slot this session writes to.
    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    /// Stacked inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Base layout.
    pub fn base(&self) -> &BaseLayout {
        &self.base
    }

    /// Raid state.
    pub fn raid(&self) -> &RaidState {
        &self.raid
    }

    /// Recipes used for crafting and build costs.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Current state as a payload document.
    pub fn snapshot(&self) -> SlotPayload {
        let mut payload = SlotPayload {
            base: self.base.clone(),
            raid: self.raid,
            ..SlotPayload::default()
        };
        payload.set_inventory(&self.inventory);
        payload
    }

    /// Pick up items. Whatever fits is kept and saved even when the
    /// inventory fills up, in which case `NoSpace` is returned afterwards.
    pub fn add_item(&mut self, item: &str, amount: u32) -> Result<(), SessionError> {
        let before = self.inventory.total_items();
        let placed_all = self.inventory.add_item(item, amount);
        if self.inventory.total_items() != before {
            self.flush_inventory()?;
        }
        if placed_all {
            Ok(())
        } else {
            Err(ActionError::NoSpace.into())
        }
    }

    /// Remove up to `amount` of `item`; returns how many were removed.
    pub fn remove_items(&mut self, item: &str, amount: u32) -> Result<u32, SessionError> {
        let removed = self.inventory.remove_items(item, amount);
        if removed > 0 {
            self.flush_inventory()?;
        }
        Ok(removed)
    }

    /// Split `amount` off the stack at `slot` into a new stack.
    pub fn split_stack(&mut self, slot: usize, amount: u32) -> Result<(), SessionError> {
        self.inventory.split_stack(slot, amount)?;
        self.flush_inventory()
    }

    /// Move or swap a stack. Returns false if nothing moved.
    pub fn move_stack(&mut self, origin: usize, target: usize) -> Result<bool, SessionError> {
        if !self.inventory.move_stack(origin, target) {
            return Ok(false);
        }
        self.flush_inventory()?;
        Ok(true)
    }

    /// Throw away the stack at `slot`.
    pub fn discard_stack(&mut self, slot: usize) -> Result<(), SessionError> {
        self.inventory
            .delete_stack(slot)
            .ok_or(ActionError::InvalidSlot(slot))?;
        self.flush_inventory()
    }

    /// Craft one `output` from the recipe book.
    pub fn craft(&mut self, output: &str) -> Result<(), SessionError> {
        let recipe = self.recipes.require(output)?;
        recipe.craft(&mut self.inventory)?;
        self.flush_inventory()
    }

    /// Build `kind` on the grid cell containing `(x, y)`, paying its
    /// recipe inputs. Cost is checked before bounds and occupancy; any
    /// refusal leaves everything unchanged.
    pub fn place_structure(&mut self, kind: &str, x: i32, y: i32) -> Result<(), SessionError> {
        let cost = self
            .recipes
            .build_cost(kind)
            .ok_or_else(|| ActionError::UnknownRecipe(kind.to_string()))?;
        if !self.inventory.can_craft(cost) {
            return Err(ActionError::MissingMaterials.into());
        }
        self.base.place(kind, StructureRect::snapped(x, y)?)?;
        self.inventory.consume(cost);
        let payload = self.snapshot();
        self.saves.save_payload(&payload, self.requested)?;
        Ok(())
    }

    /// Move the player and save the new position.
    pub fn move_player(&mut self, position: PlayerPosition) -> Result<(), SessionError> {
        self.base.player_position = position;
        self.saves.save_base(Some(position), None, self.requested)?;
        Ok(())
    }

    /// Change raid noise by `delta`, clamped to the valid range.
    pub fn add_noise(&mut self, delta: i64) -> Result<u32, SessionError> {
        self.raid.add_noise(delta);
        self.saves.save_raid(Some(i64::from(self.raid.noise)), None, self.requested)?;
        Ok(self.raid.noise)
    }

    /// Change the weather.
    pub fn set_weather(&mut self, weather: Weather) -> Result<(), SessionError> {
        self.raid.weather = weather;
        self.saves.save_raid(None, Some(weather), self.requested)?;
        Ok(())
    }

    fn flush_inventory(&mut self) -> Result<(), SessionError> {
        let items = self.inventory.to_flat();
        self.saves.save_inventory(&items, self.requested)?;
        Ok(())
    }
}
