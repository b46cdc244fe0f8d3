//! Stacked inventory for the active save slot.
//!
//! Holds up to [`MAX_SLOTS`] stacks of at most [`MAX_STACK`] items each, in
//! display order. Save files store the inventory as a flat list of item ids;
//! [`Inventory::from_flat`] and [`Inventory::to_flat`] convert between the two.

use holdfast_core::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::ActionError;

/// Maximum number of items in one stack.
pub const MAX_STACK: u32 = 100;

/// Number of stacks an inventory can hold.
pub const MAX_SLOTS: usize = 18;

/// Item amounts required by a recipe or build cost.
pub type Requirements = BTreeMap<ItemId, u32>;

/// A stack of identical items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier.
    pub item: ItemId,
    /// Number of items in this stack, `1..=MAX_STACK`.
    pub quantity: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.quantity >= MAX_STACK
    }

    /// Get remaining space in this stack.
    pub fn remaining_space(&self) -> u32 {
        MAX_STACK.saturating_sub(self.quantity)
    }

    /// Try to add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.remaining_space());
        self.quantity += added;
        amount - added
    }

    /// Try to remove items from this stack, returning the amount actually removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        removed
    }

    /// Split this stack, taking the specified amount into a new stack.
    ///
    /// Both halves must keep at least one item.
    pub fn split(&mut self, amount: u32) -> Option<ItemStack> {
        if amount == 0 || amount >= self.quantity {
            return None;
        }

        self.quantity -= amount;
        Some(ItemStack::new(self.item.clone(), amount))
    }
}

/// Ordered, capacity-bounded sequence of item stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    /// Create a new empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build stacks from the flat on-disk item list.
    ///
    /// Items are grouped by id in order of first appearance and packed into
    /// full stacks. Stacks beyond [`MAX_SLOTS`] are dropped.
    pub fn from_flat<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order: Vec<ItemId> = Vec::new();
        let mut counts: HashMap<ItemId, u32> = HashMap::new();
        for item in items {
            let item = item.as_ref();
            match counts.get_mut(item) {
                Some(count) => *count += 1,
                None => {
                    order.push(item.to_string());
                    counts.insert(item.to_string(), 1);
                }
            }
        }

        let mut stacks = Vec::new();
        let mut dropped = 0u32;
        for item in order {
            let mut remaining = counts.get(&item).copied().unwrap_or(0);
            while remaining > 0 {
                let take = remaining.min(MAX_STACK);
                if stacks.len() < MAX_SLOTS {
                    stacks.push(ItemStack::new(item.clone(), take));
                } else {
                    dropped += take;
                }
                remaining -= take;
            }
        }

        if dropped > 0 {
            warn!(dropped, "saved inventory exceeds {MAX_SLOTS} stacks; extra items discarded");
        }

        Self { stacks }
    }

    /// Flatten to the on-disk item list: each stack expanded in stack order.
    pub fn to_flat(&self) -> Vec<ItemId> {
        self.stacks
            .iter()
            .flat_map(|stack| std::iter::repeat(stack.item.clone()).take(stack.quantity as usize))
            .collect()
    }

    /// Stacks in display order.
    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    /// Get the stack at a display position.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.stacks.get(slot)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Check if the inventory holds nothing.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Check if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.stacks.len() >= MAX_SLOTS
    }

    /// Total number of items across all stacks.
    pub fn total_items(&self) -> u32 {
        self.stacks.iter().map(|stack| stack.quantity).sum()
    }

    /// Add `amount` of `item`, topping up partial stacks before opening new ones.
    ///
    /// Returns false when the inventory filled up before everything was
    /// placed. Whatever did fit stays in the inventory.
    pub fn add_item(&mut self, item: &str, amount: u32) -> bool {
        let mut remaining = amount;

        for stack in self.stacks.iter_mut() {
            if remaining == 0 {
                return true;
            }
            if stack.item == item && !stack.is_full() {
                remaining = stack.add(remaining);
            }
        }

        while remaining > 0 {
            if self.is_full() {
                return false;
            }
            let take = remaining.min(MAX_STACK);
            self.stacks.push(ItemStack::new(item, take));
            remaining -= take;
        }

        true
    }

    /// Remove up to `amount` of `item`, earliest stacks first.
    /// Returns the actual amount removed.
    pub fn remove_items(&mut self, item: &str, amount: u32) -> u32 {
        let mut remaining = amount;

        for stack in self.stacks.iter_mut() {
            if remaining == 0 {
                break;
            }
            if stack.item == item {
                remaining -= stack.remove(remaining);
            }
        }

        self.stacks.retain(|stack| stack.quantity > 0);
        amount - remaining
    }

    /// Count the total number of a specific item in the inventory.
    pub fn count_item(&self, item: &str) -> u32 {
        self.stacks
            .iter()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.quantity)
            .sum()
    }

    /// Move `amount` items out of the stack at `slot` into a new stack right after it.
    pub fn split_stack(&mut self, slot: usize, amount: u32) -> Result<(), ActionError> {
        let quantity = self
            .stacks
            .get(slot)
            .map(|stack| stack.quantity)
            .ok_or(ActionError::InvalidSlot(slot))?;
        if amount == 0 || amount >= quantity {
            return Err(ActionError::InvalidSplit { amount, quantity });
        }
        if self.is_full() {
            return Err(ActionError::NoSpace);
        }

        let split = self.stacks[slot]
            .split(amount)
            .ok_or(ActionError::InvalidSplit { amount, quantity })?;
        self.stacks.insert(slot + 1, split);
        Ok(())
    }

    /// Drag the stack at `origin` onto `target`.
    ///
    /// Dropping past the last stack moves it to the end; dropping onto
    /// another stack swaps the two. Returns true if anything moved.
    pub fn move_stack(&mut self, origin: usize, target: usize) -> bool {
        if origin == target || origin >= self.stacks.len() || target >= MAX_SLOTS {
            return false;
        }

        if target >= self.stacks.len() {
            let stack = self.stacks.remove(origin);
            self.stacks.push(stack);
        } else {
            self.stacks.swap(origin, target);
        }
        true
    }

    /// Discard the stack at `slot`.
    pub fn delete_stack(&mut self, slot: usize) -> Option<ItemStack> {
        if slot >= self.stacks.len() {
            return None;
        }
        Some(self.stacks.remove(slot))
    }

    /// Check that every requirement is covered.
    pub fn can_craft(&self, requirements: &Requirements) -> bool {
        requirements
            .iter()
            .all(|(item, &amount)| self.count_item(item) >= amount)
    }

    /// Remove every requirement without checking coverage first.
    ///
    /// Pair with [`Inventory::can_craft`], or use [`Inventory::try_consume`].
    pub fn consume(&mut self, requirements: &Requirements) {
        for (item, &amount) in requirements {
            self.remove_items(item, amount);
        }
    }

    /// Check and consume in one step; nothing is removed unless everything is covered.
    pub fn try_consume(&mut self, requirements: &Requirements) -> bool {
        if !self.can_craft(requirements) {
            return false;
        }
        self.consume(requirements);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(inv: &Inventory, item: &str) -> Vec<u32> {
        inv.stacks()
            .iter()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.quantity)
            .collect()
    }

    fn full_of_distinct_items() -> Inventory {
        let mut inv = Inventory::new();
        for i in 0..MAX_SLOTS {
            assert!(inv.add_item(&format!("item{i}"), MAX_STACK));
        }
        inv
    }

    #[test]
    fn item_stack_add_and_split() {
        let mut stack = ItemStack::new("Wood", 60);
        assert_eq!(stack.add(50), 10);
        assert!(stack.is_full());

        let split = stack.split(30).unwrap();
        assert_eq!(split.quantity, 30);
        assert_eq!(stack.quantity, 70);

        assert!(stack.split(0).is_none());
        assert!(stack.split(70).is_none());
    }

    #[test]
    fn add_fills_full_stacks_then_remainder() {
        let mut inv = Inventory::new();
        assert!(inv.add_item("Wood", 250));
        assert_eq!(quantities(&inv, "Wood"), vec![100, 100, 50]);
        assert_eq!(inv.count_item("Wood"), 250);

        inv.remove_items("Wood", 150);
        assert_eq!(quantities(&inv, "Wood"), vec![100]);
        assert_eq!(inv.count_item("Wood"), 100);
    }

    #[test]
    fn add_tops_up_partial_stacks_lowest_first() {
        let mut inv = Inventory::new();
        inv.add_item("Wood", 40);
        inv.add_item("Stone", 10);
        inv.add_item("Wood", 70);

        assert_eq!(inv.stacks()[0], ItemStack::new("Wood", 100));
        assert_eq!(inv.stacks()[1], ItemStack::new("Stone", 10));
        assert_eq!(inv.stacks()[2], ItemStack::new("Wood", 10));
    }

    #[test]
    fn add_to_full_inventory_is_rejected_without_changes() {
        let mut inv = full_of_distinct_items();
        let before = inv.clone();

        assert!(!inv.add_item("Stone", 1));
        assert_eq!(inv, before);
    }

    #[test]
    fn add_keeps_partial_progress_when_slots_run_out() {
        let mut inv = Inventory::new();
        for i in 0..MAX_SLOTS - 2 {
            inv.add_item(&format!("item{i}"), 1);
        }
        inv.add_item("Wood", 50);

        assert!(!inv.add_item("Wood", 200));
        assert_eq!(inv.count_item("Wood"), 200);
        assert_eq!(inv.len(), MAX_SLOTS);
    }

    #[test]
    fn remove_more_than_present_takes_everything() {
        let mut inv = Inventory::new();
        inv.add_item("Metal", 30);
        assert_eq!(inv.remove_items("Metal", 50), 30);
        assert!(inv.is_empty());
        assert_eq!(inv.remove_items("Metal", 5), 0);
    }

    #[test]
    fn split_inserts_after_source() {
        let mut inv = Inventory::new();
        inv.add_item("Wood", 80);
        inv.add_item("Stone", 5);

        inv.split_stack(0, 30).unwrap();
        assert_eq!(inv.stacks()[0], ItemStack::new("Wood", 50));
        assert_eq!(inv.stacks()[1], ItemStack::new("Wood", 30));
        assert_eq!(inv.stacks()[2], ItemStack::new("Stone", 5));
        assert_eq!(inv.count_item("Wood"), 80);
    }

    #[test]
    fn split_rejects_bad_amounts_and_full_inventory() {
        let mut inv = Inventory::new();
        inv.add_item("Wood", 10);
        assert_eq!(
            inv.split_stack(0, 10),
            Err(ActionError::InvalidSplit {
                amount: 10,
                quantity: 10
            })
        );
        assert!(matches!(
            inv.split_stack(0, 0),
            Err(ActionError::InvalidSplit { .. })
        ));
        assert_eq!(inv.split_stack(3, 1), Err(ActionError::InvalidSlot(3)));

        let mut full = full_of_distinct_items();
        let before = full.clone();
        assert_eq!(full.split_stack(0, 10), Err(ActionError::NoSpace));
        assert_eq!(full, before);
        assert_eq!(ActionError::NoSpace.to_string(), "not enough space");
    }

    #[test]
    fn move_swaps_or_appends() {
        let mut inv = Inventory::new();
        inv.add_item("Wood", 1);
        inv.add_item("Stone", 1);
        inv.add_item("Metal", 1);

        assert!(inv.move_stack(0, 2));
        let order: Vec<&str> = inv.stacks().iter().map(|s| s.item.as_str()).collect();
        assert_eq!(order, vec!["Metal", "Stone", "Wood"]);

        assert!(inv.move_stack(0, 10));
        let order: Vec<&str> = inv.stacks().iter().map(|s| s.item.as_str()).collect();
        assert_eq!(order, vec!["Stone", "Wood", "Metal"]);

        assert!(!inv.move_stack(1, 1));
        assert!(!inv.move_stack(5, 0));
        assert!(!inv.move_stack(0, MAX_SLOTS));
    }

    #[test]
    fn delete_stack_discards_unconditionally() {
        let mut inv = Inventory::new();
        inv.add_item("Food", 7);
        assert_eq!(inv.delete_stack(0), Some(ItemStack::new("Food", 7)));
        assert_eq!(inv.delete_stack(0), None);
    }

    #[test]
    fn crafting_checks_and_consumes() {
        let mut inv = Inventory::new();
        inv.add_item("Wood", 12);
        inv.add_item("Metal", 1);

        let mut door = Requirements::new();
        door.insert("Wood".into(), 8);
        door.insert("Metal".into(), 4);
        assert!(!inv.can_craft(&door));
        assert!(!inv.try_consume(&door));
        assert_eq!(inv.count_item("Wood"), 12);

        let mut wall = Requirements::new();
        wall.insert("Wood".into(), 10);
        assert!(inv.try_consume(&wall));
        assert_eq!(inv.count_item("Wood"), 2);
    }

    #[test]
    fn flat_encoding_groups_by_first_appearance() {
        let inv = Inventory::from_flat(["Stone", "Wood", "Stone", "Wood", "Stone"]);
        assert_eq!(inv.stacks()[0], ItemStack::new("Stone", 3));
        assert_eq!(inv.stacks()[1], ItemStack::new("Wood", 2));
        assert_eq!(
            inv.to_flat(),
            vec!["Stone", "Stone", "Stone", "Wood", "Wood"]
        );
    }

    #[test]
    fn flat_encoding_splits_large_counts() {
        let flat = vec!["Wood"; 230];
        let inv = Inventory::from_flat(&flat);
        assert_eq!(quantities(&inv, "Wood"), vec![100, 100, 30]);
        assert_eq!(inv.to_flat().len(), 230);
    }

    #[test]
    fn flat_encoding_caps_stack_count() {
        let flat: Vec<String> = (0..MAX_SLOTS + 2).map(|i| format!("item{i}")).collect();
        let inv = Inventory::from_flat(&flat);
        assert_eq!(inv.len(), MAX_SLOTS);
        assert_eq!(inv.count_item("item19"), 0);
    }
}
