//! Crafting with JSON-loadable recipes.
//!
//! Every recipe produces a single item from a set of inputs. The base-camp
//! catalogue doubles as the build-cost table for placeable structures.

use crate::inventory::{Inventory, Requirements};
use crate::ActionError;
use anyhow::{Context, Result};
use holdfast_core::{item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Crafting recipe definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Item produced by this recipe.
    pub output: ItemId,
    /// Items consumed, by id.
    pub inputs: Requirements,
    /// Amount of output item produced.
    #[serde(default = "default_output_count")]
    pub output_count: u32,
}

fn default_output_count() -> u32 {
    1
}

impl Recipe {
    /// Create a recipe producing one `output`.
    pub fn new<'a>(output: &str, inputs: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self {
            output: output.to_string(),
            inputs: inputs
                .into_iter()
                .map(|(item, count)| (item.to_string(), count))
                .collect(),
            output_count: 1,
        }
    }

    /// Check if the given inventory contains all required inputs.
    pub fn can_craft(&self, inventory: &Inventory) -> bool {
        inventory.can_craft(&self.inputs)
    }

    /// Consume the inputs and add the output.
    ///
    /// All-or-nothing: if the output does not fit, the inventory is restored.
    pub fn craft(&self, inventory: &mut Inventory) -> Result<(), ActionError> {
        let snapshot = inventory.clone();
        if !inventory.try_consume(&self.inputs) {
            return Err(ActionError::MissingMaterials);
        }
        if !inventory.add_item(&self.output, self.output_count) {
            *inventory = snapshot;
            return Err(ActionError::NoSpace);
        }
        Ok(())
    }
}

/// Recipe registry keyed by output item.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: BTreeMap<ItemId, Recipe>,
}

impl RecipeBook {
    /// Create a new empty recipe book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load recipes from a JSON array.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let recipes: Vec<Recipe> =
            serde_json::from_str(content).context("Failed to parse recipe JSON")?;

        let mut book = Self::new();
        for recipe in recipes {
            book.add_recipe(recipe);
        }
        Ok(book)
    }

    /// Add a recipe, replacing any recipe for the same output.
    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.output.clone(), recipe);
    }

    /// Get the recipe producing `output`.
    pub fn get(&self, output: &str) -> Option<&Recipe> {
        self.recipes.get(output)
    }

    /// Look up a recipe, failing with [`ActionError::UnknownRecipe`].
    pub fn require(&self, output: &str) -> Result<&Recipe, ActionError> {
        self.get(output)
            .ok_or_else(|| ActionError::UnknownRecipe(output.to_string()))
    }

    /// Inputs consumed to place `structure`; `None` unless it is a known
    /// structure with a recipe.
    pub fn build_cost(&self, structure: &str) -> Option<&Requirements> {
        if !item::is_structure(structure) {
            return None;
        }
        self.get(structure).map(|recipe| &recipe.inputs)
    }

    /// Recipes the inventory can currently afford.
    pub fn craftable<'a>(&'a self, inventory: &'a Inventory) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.recipes
            .values()
            .filter(move |recipe| recipe.can_craft(inventory))
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if no recipes are registered.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// The base-camp catalogue.
    pub fn with_defaults() -> Self {
        let mut book = Self::new();
        book.add_recipe(Recipe::new(
            item::WORKBENCH,
            [(item::WOOD, 5), (item::METAL, 2)],
        ));
        book.add_recipe(Recipe::new(item::WALL, [(item::WOOD, 10)]));
        book.add_recipe(Recipe::new(
            item::DOOR,
            [(item::WOOD, 8), (item::METAL, 4)],
        ));
        book.add_recipe(Recipe::new(
            item::FARM_PLOT,
            [(item::WOOD, 6), (item::STONE, 4)],
        ));
        book
    }
}
