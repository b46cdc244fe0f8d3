use holdfast_core::SlotIndex;
use holdfast_save::{SaveManager, SlotPayload, Storage};
use holdfast_testkit::{assert_json_snapshot, TempRoot};
use holdfast_world::{
    Inventory, PlacedStructure, PlayerPosition, StructureRect, Weather, MAX_NOISE,
};
use serde_json::json;

fn snapshot_path(name: &str) -> String {
    format!("{}/tests/snapshots/{name}.json", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn default_payload_matches_golden() {
    assert_json_snapshot(snapshot_path("default_payload"), &SlotPayload::default()).unwrap();
}

#[test]
fn full_payload_round_trips() {
    let root = TempRoot::new("payload").unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));

    let mut inventory = Inventory::new();
    inventory.add_item("Wood", 250);
    inventory.add_item("Metal", 3);
    let mut payload = SlotPayload::default();
    payload.set_inventory(&inventory);
    payload.base.player_position = PlayerPosition(-40, 1200);
    payload.base.placed_structures = vec![
        PlacedStructure {
            kind: "Wall".to_string(),
            rect: StructureRect::cell(0, 0),
        },
        PlacedStructure {
            kind: "FarmPlot".to_string(),
            rect: StructureRect::cell(80, 40),
        },
    ];
    payload.raid.noise = 77;
    payload.raid.weather = Weather::Fog;

    saves.save_payload(&payload, None).unwrap();
    let loaded = saves.load(None);
    assert_eq!(loaded, payload);
    assert_eq!(loaded.stacked_inventory(), inventory);
}

#[test]
fn empty_state_round_trips() {
    let root = TempRoot::new("payload").unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));
    saves
        .create_slot(SlotIndex::FIRST, "Empty run", false)
        .unwrap();

    let no_structures: &[PlacedStructure] = &[];
    saves.save_inventory(&[], None).unwrap();
    saves.save_base(None, Some(no_structures), None).unwrap();

    let loaded = saves.load(None);
    assert!(loaded.inventory.is_empty());
    assert!(loaded.base.placed_structures.is_empty());
    assert_eq!(loaded, SlotPayload::default());
}

#[test]
fn missing_slot_loads_defaults() {
    let root = TempRoot::new("payload").unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));
    let third = SlotIndex::new(3, 3).unwrap();
    assert_eq!(saves.load(Some(third)), SlotPayload::default());
    assert!(root.saves_listing().unwrap().is_empty());
}

#[test]
fn corrupt_payload_loads_defaults_and_is_replaced_on_save() {
    let root = TempRoot::new("payload").unwrap();
    root.write_raw("saves/save_slot1.json", "[1, 2,").unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));

    assert_eq!(saves.load(Some(SlotIndex::FIRST)), SlotPayload::default());

    saves
        .save_inventory(&["Food".to_string()], Some(SlotIndex::FIRST))
        .unwrap();
    assert_eq!(
        root.read_json("saves/save_slot1.json").unwrap()["inventory"],
        json!(["Food"])
    );
}

#[test]
fn out_of_range_values_on_disk_are_clamped() {
    let root = TempRoot::new("payload").unwrap();
    root.write_slot_document(
        SlotIndex::FIRST,
        &json!({"raid": {"noise": 9000, "weather": "Blizzard"}}),
    )
    .unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));

    let loaded = saves.load(Some(SlotIndex::FIRST));
    assert_eq!(loaded.raid.noise, MAX_NOISE);
    assert_eq!(loaded.raid.weather, Weather::Clear);
}

#[test]
fn negative_noise_on_disk_does_not_cost_the_slot() {
    let root = TempRoot::new("payload").unwrap();
    root.write_slot_document(
        SlotIndex::FIRST,
        &json!({
            "inventory": ["Wood", "Wood"],
            "base": {"player_pos": [1, 2], "placed_structures": []},
            "raid": {"noise": -1, "weather": "rain"}
        }),
    )
    .unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));

    saves
        .save_raid(None, Some(Weather::Fog), Some(SlotIndex::FIRST))
        .unwrap();
    let loaded = saves.load(Some(SlotIndex::FIRST));
    assert_eq!(loaded.inventory, vec!["Wood", "Wood"]);
    assert_eq!(loaded.base.player_position, PlayerPosition(1, 2));
    assert_eq!(loaded.raid.noise, 0);
    assert_eq!(loaded.raid.weather, Weather::Fog);
}

#[test]
fn partial_base_update_keeps_other_fields() {
    let root = TempRoot::new("payload").unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));
    let wall = PlacedStructure {
        kind: "Wall".to_string(),
        rect: StructureRect::cell(40, 0),
    };

    saves
        .save_base(None, Some(std::slice::from_ref(&wall)), None)
        .unwrap();
    saves
        .save_base(Some(PlayerPosition(9, 9)), None, None)
        .unwrap();

    let base = saves.load(None).base;
    assert_eq!(base.player_position, PlayerPosition(9, 9));
    assert_eq!(base.placed_structures, vec![wall]);
}

#[test]
fn writes_leave_no_temp_files() {
    let root = TempRoot::new("payload").unwrap();
    let mut saves = SaveManager::open(Storage::new(root.path()));
    saves.create_slot(SlotIndex::FIRST, "A", false).unwrap();
    saves.save_raid(Some(3), None, None).unwrap();

    assert_eq!(
        root.saves_listing().unwrap(),
        vec!["meta.json", "save_slot1.json"]
    );
}
