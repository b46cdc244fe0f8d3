use anyhow::{anyhow, Context, Result};
use holdfast_core::SlotIndex;
use holdfast_save::{SaveManager, SlotMetadata, SlotPayload, SlotSession};
use holdfast_world::{Recipe, RecipeBook, Weather, MAX_NOISE};

use crate::config::{parse_resolution, DisplayConfig};
use crate::Command;

pub(crate) fn run(
    saves: &mut SaveManager,
    slot: Option<SlotIndex>,
    recipes: &RecipeBook,
    command: Command,
) -> Result<()> {
    match command {
        Command::Slots => {
            let slots = saves.list_slots();
            let active = saves.active_slot();
            for meta in slots {
                println!("{}", slot_line(&meta, active == Some(meta.index)));
            }
        }
        Command::New {
            slot: n,
            name,
            overwrite,
        } => {
            let index = saves.storage().slot(n)?;
            let created = saves.create_slot(index, name.as_deref().unwrap_or(""), overwrite)?;
            if !created {
                return Err(anyhow!(
                    "slot {index} is already in use (pass --overwrite to replace it)"
                ));
            }
            println!("created slot {index}");
        }
        Command::Select { slot: n } => {
            let index = saves.storage().slot(n)?;
            if !saves.activate_slot(index)? {
                return Err(anyhow!("slot {index} is empty"));
            }
            println!("selected slot {index}");
        }
        Command::Delete { slot: n } => {
            let index = saves.storage().slot(n)?;
            saves.delete_slot(index)?;
            println!("deleted slot {index}");
        }
        Command::Show => {
            let payload = saves.load(slot);
            let index = saves.resolve_slot(slot);
            print!("{}", describe(index, &payload));
        }
        Command::Give { item, amount } => {
            let mut session = open_session(saves, slot, recipes);
            session.add_item(&item, amount)?;
            println!("{item}: {}", session.inventory().count_item(&item));
        }
        Command::Take { item, amount } => {
            let mut session = open_session(saves, slot, recipes);
            let removed = session.remove_items(&item, amount)?;
            println!("removed {removed} {item}");
        }
        Command::Recipes => {
            let session = open_session(saves, slot, recipes);
            for recipe in session.recipes().craftable(session.inventory()) {
                println!("{}", recipe_line(recipe));
            }
        }
        Command::Craft { recipe } => {
            let mut session = open_session(saves, slot, recipes);
            session.craft(&recipe)?;
            println!("crafted {recipe}");
        }
        Command::Place { kind, x, y } => {
            let mut session = open_session(saves, slot, recipes);
            session.place_structure(&kind, x, y)?;
            if let Some(placed) = session.base().placed_structures.last() {
                println!("placed {kind} at ({}, {})", placed.rect.x, placed.rect.y);
            }
        }
        Command::Noise { delta } => {
            let mut session = open_session(saves, slot, recipes);
            let noise = session.add_noise(delta)?;
            println!("noise {noise}/{MAX_NOISE}");
        }
        Command::Weather { weather } => {
            let weather = Weather::parse(&weather).with_context(|| {
                format!("unknown weather {weather:?} (expected clear, rain or fog)")
            })?;
            open_session(saves, slot, recipes).set_weather(weather)?;
            println!("weather {weather}");
        }
        Command::Display {
            fullscreen,
            resolution,
        } => {
            let root = saves.storage().root().to_path_buf();
            let mut display = DisplayConfig::load(&root);
            let changed = fullscreen.is_some() || resolution.is_some();
            if let Some(fullscreen) = fullscreen {
                display.fullscreen = fullscreen;
            }
            if let Some(resolution) = resolution {
                display.resolution = parse_resolution(&resolution)?;
            }
            if changed {
                display.save(&root)?;
            }
            let [width, height] = display.resolution;
            println!("fullscreen {} resolution {width}x{height}", display.fullscreen);
        }
    }
    Ok(())
}

fn open_session<'a>(
    saves: &'a mut SaveManager,
    slot: Option<SlotIndex>,
    recipes: &RecipeBook,
) -> SlotSession<'a> {
    saves.session(slot).with_recipes(recipes.clone())
}

fn recipe_line(recipe: &Recipe) -> String {
    let inputs: Vec<String> = recipe
        .inputs
        .iter()
        .map(|(item, count)| format!("{item} x{count}"))
        .collect();
    format!("{} x{} <- {}", recipe.output, recipe.output_count, inputs.join(", "))
}

fn slot_line(meta: &SlotMetadata, active: bool) -> String {
    let marker = if active { '*' } else { ' ' };
    let played = meta
        .last_played
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{marker} {} {:<20} {played}", meta.index, meta.display_name())
}

fn describe(index: SlotIndex, payload: &SlotPayload) -> String {
    let inventory = payload.stacked_inventory();
    let mut out = format!("slot {index}\ninventory ({} stacks)\n", inventory.len());
    for (position, stack) in inventory.stacks().iter().enumerate() {
        out.push_str(&format!("  [{position}] {} x{}\n", stack.item, stack.quantity));
    }

    let base = &payload.base;
    out.push_str(&format!(
        "player at ({}, {})\nstructures ({})\n",
        base.player_position.0,
        base.player_position.1,
        base.placed_structures.len()
    ));
    for structure in &base.placed_structures {
        out.push_str(&format!(
            "  {} at ({}, {})\n",
            structure.kind, structure.rect.x, structure.rect.y
        ));
    }

    out.push_str(&format!(
        "noise {}/{MAX_NOISE} weather {}\n",
        payload.raid.noise, payload.raid.weather
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdfast_world::{Inventory, StructureRect};

    #[test]
    fn describe_lists_stacks_and_structures() {
        let mut payload = SlotPayload::default();
        let mut inventory = Inventory::new();
        inventory.add_item("Wood", 130);
        payload.set_inventory(&inventory);
        payload.base.place("Wall", StructureRect::cell(40, 80)).unwrap();

        let text = describe(SlotIndex::FIRST, &payload);
        assert!(text.starts_with("slot 1\ninventory (2 stacks)\n"));
        assert!(text.contains("  [0] Wood x100\n  [1] Wood x30\n"));
        assert!(text.contains("  Wall at (40, 80)\n"));
        assert!(text.ends_with("noise 0/200 weather clear\n"));
    }

    #[test]
    fn recipe_line_lists_inputs_in_order() {
        let recipe = Recipe::new("Door", [("Wood", 8), ("Metal", 4)]);
        assert_eq!(recipe_line(&recipe), "Door x1 <- Metal x4, Wood x8");
    }

    #[test]
    fn slot_line_marks_active_slot() {
        let meta = SlotMetadata::empty(SlotIndex::FIRST);
        assert_eq!(slot_line(&meta, false), format!("  1 {:<20} -", "Empty"));
        assert!(slot_line(&meta, true).starts_with("* 1"));
    }
}
