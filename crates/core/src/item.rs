//! Item identifiers.
//!
//! Items are named by plain strings ("Wood", "Door", ...). The same string is
//! the on-disk encoding, so renaming an item is a save-format change.

/// Item identifier as stored in save files.
pub type ItemId = String;

/// Raw material gathered during raids.
pub const WOOD: &str = "Wood";
/// Raw material.
pub const STONE: &str = "Stone";
/// Raw material.
pub const METAL: &str = "Metal";
/// Consumable picked up during raids.
pub const FOOD: &str = "Food";

/// Craftable structures.
pub const WORKBENCH: &str = "Workbench";
/// Craftable structure.
pub const WALL: &str = "Wall";
/// Craftable structure.
pub const DOOR: &str = "Door";
/// Craftable structure.
pub const FARM_PLOT: &str = "FarmPlot";

/// Structures that can be placed in the base, in build-menu order.
pub const BUILD_CATALOG: [&str; 4] = [WALL, DOOR, WORKBENCH, FARM_PLOT];

/// Returns true if `item` is a known placeable structure.
pub fn is_structure(item: &str) -> bool {
    BUILD_CATALOG.contains(&item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_materials_are_not_structures() {
        for material in [WOOD, STONE, METAL, FOOD] {
            assert!(!is_structure(material), "{material} should not be placeable");
        }
        assert!(is_structure(FARM_PLOT));
    }
}
