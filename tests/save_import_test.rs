//! Save, export, and import through the public persistence API.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squares::core::{game_tick, process_offline_progression, GameState};
use squares::persistence::{
    export_json, import_json, load_or_default, save_game, MemoryStore, SaveData, SaveError,
    SaveManager, SaveStore,
};
use squares::shop::{SkillId, UpgradeId};

fn played_for(ms: i64) -> GameState {
    let mut state = GameState::new(0);
    state.settings.debug_disable_slowdown = true;
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut now = 0;
    while now < ms {
        now += 100;
        game_tick(&mut state, now, &mut rng);
    }
    // Transient settings are not saved
    state.settings = Default::default();
    state
}

#[test]
fn test_import_without_layer_leaves_state_untouched() {
    let state = played_for(15_000);
    let before = state.clone();

    let result = import_json(r#"{"prestigeLevel": 1, "currency": 1e9}"#, 20_000);
    assert!(matches!(result, Err(SaveError::MissingField("layer"))));
    assert_eq!(state, before);
}

#[test]
fn test_import_rejects_text_that_is_not_json() {
    let err = import_json("{ this is not a save", 0).unwrap_err();
    assert!(matches!(err, SaveError::Unparsable(_)));
    assert!(err.to_string().starts_with("save data could not be parsed"));
}

#[test]
fn test_export_import_round_trip() {
    let mut state = played_for(13_000);
    assert_eq!(state.layer.completed_rows, 1);
    state.upgrades.insert(UpgradeId::FillFaster, 2);
    state.prestige.add_currency(0, 3.0);
    state.skills.insert(SkillId::FillRate1);

    let json = export_json(&state, 13_000).unwrap();
    let (restored, report) = import_json(&json, 99_000).unwrap();

    assert_eq!(restored, state);
    assert!(report.skipped_ids.is_empty());
    assert_eq!(report.refunded_pink, 0.0);
}

#[test]
fn test_spinning_bonus_in_save_lands_on_resume() {
    let mut state = GameState::new(0);
    state.settings.debug_disable_slowdown = true;
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    for t in 1..=12 {
        game_tick(&mut state, t * 1_000, &mut rng);
    }
    assert_eq!(state.layer.pending_bonuses(), 1);

    let mut store = MemoryStore::default();
    save_game(&mut store, &state, 12_000).unwrap();

    // Back an hour later
    let (mut loaded, _) = load_or_default(&store, 3_612_000);
    assert_eq!(loaded.layer.pending_bonuses(), 1);
    process_offline_progression(&mut loaded, 3_612_000, &mut rng);
    assert_eq!(loaded.layer.pending_bonuses(), 0);
}

#[test]
fn test_older_snapshot_defaults_missing_fields() {
    let fresh = GameState::new(0);
    let layer = serde_json::to_value(&fresh.layer).unwrap();
    let json = serde_json::json!({
        "layer": layer,
        "prestigeLevel": 0,
        "currency": 42.0,
        "upgrades": [{"id": "fill_faster", "level": 3}],
        "skills": [{"id": "mana_boost_1", "purchased": true}],
        "prestigeCurrencies": [10.0],
        "timestamp": 5_000
    });

    let (state, report) = import_json(&json.to_string(), 9_000).unwrap();
    assert_eq!(state.currency, 42.0);
    assert_eq!(state.upgrade_level(UpgradeId::FillFaster), 3);
    assert_eq!(state.mana, 0.0);
    assert_eq!(state.last_update, 5_000);
    assert!(!state.combos_unlocked);

    // No skillTableVersion: skills priced under the old table are refunded
    assert!(state.skills.is_empty());
    assert_eq!(report.refunded_pink, SkillId::ManaBoost1.def().cost);
    assert_eq!(state.pink(), 10.0 + SkillId::ManaBoost1.def().cost);
}

#[test]
fn test_file_store_round_trip() {
    let dir = std::env::temp_dir().join(format!("squares-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut manager = SaveManager::at_path(dir.join("save.dat"));

    let state = played_for(4_000);
    save_game(&mut manager, &state, 4_000).unwrap();
    let data: SaveData = manager.load().unwrap().unwrap();
    assert_eq!(data.timestamp, Some(4_000));

    let (loaded, _) = load_or_default(&manager, 10_000);
    assert_eq!(loaded, state);

    manager.delete().unwrap();
    assert!(!manager.save_exists());
    let _ = std::fs::remove_dir(&dir);
}

#[test]
fn test_inconsistent_cursor_still_completes_first_row() {
    let mut state = GameState::new(0);
    state.layer.current_square_index = 12;
    state.layer.total_squares = 12;
    let mut store = MemoryStore::default();
    save_game(&mut store, &state, 0).unwrap();

    let (mut loaded, _) = load_or_default(&store, 0);
    assert_eq!(loaded.layer.current_square_index, 0);

    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let mut now = 0;
    while now < 30_000 {
        now += 100;
        game_tick(&mut loaded, now, &mut rng);
    }
    assert!(loaded.layer.completed_rows >= 1);
    assert!(loaded.layer.row_bonuses.iter().any(|b| b.row == 0));
}

#[test]
fn test_partial_layer_import_keeps_currencies() {
    let json = r#"{"layer":{"totalSquares":5,"currentSquareIndex":5},"prestigeLevel":0,"currency":7,"prestigeCurrencies":[4.0]}"#;
    let (state, _) = import_json(json, 0).unwrap();
    assert_eq!(state.currency, 7.0);
    assert_eq!(state.pink(), 4.0);
    assert_eq!(state.layer.total_squares, 5);
}
