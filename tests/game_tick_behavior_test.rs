//! Tick-level behaviour through the public API: row spins, income, combos,
//! shop actions, and the guarantees collect gives around pending bonuses.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squares::core::constants::{GRID_SIZE, SPIN_DURATION_MS, TOTAL_SQUARES};
use squares::core::multipliers::is_spell_active;
use squares::core::{collect, game_tick, Award, GameState, TickEvent};
use squares::grid::{resolve_row_bonus, GridLayer, RowBonus};
use squares::shop::{
    cast_spell, purchase_skill, purchase_upgrade, ActionError, SkillId, SpellId, UpgradeId,
};

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Bottom row filled except its last square, constant 1 s squares.
fn row_almost_done() -> GameState {
    let mut state = GameState::new(0);
    state.settings.debug_disable_slowdown = true;
    for square in state.layer.squares.iter_mut().take(GRID_SIZE - 1) {
        square.filled = true;
        square.fill_progress = 1.0;
    }
    state.layer.total_squares = (GRID_SIZE - 1) as u32;
    state.layer.current_square_index = GRID_SIZE - 1;
    state
}

#[test]
fn test_row_bonus_spins_then_lands() {
    let mut state = row_almost_done();
    let mut rng = rng(1);

    let result = game_tick(&mut state, 1_000, &mut rng);
    assert!(result
        .events
        .contains(&TickEvent::RowCompleted { row: 0, multiplier: None }));
    assert_eq!(state.layer.completed_rows, 1);
    assert!(state.layer.squares[..GRID_SIZE].iter().all(|s| s.row_completed));
    assert_eq!(state.layer.pending_bonuses(), 1);
    assert_eq!(state.layer.total_multiplier(), 1.0);

    let result = game_tick(&mut state, 1_000 + SPIN_DURATION_MS - 1, &mut rng);
    assert!(result.events.is_empty());
    assert_eq!(state.layer.pending_bonuses(), 1);

    let result = game_tick(&mut state, 1_000 + SPIN_DURATION_MS, &mut rng);
    let landed: Vec<f64> = result
        .events
        .iter()
        .filter_map(|e| match e {
            TickEvent::RowBonusResolved { row: 0, multiplier } => Some(*multiplier),
            _ => None,
        })
        .collect();
    assert_eq!(landed.len(), 1);
    assert_eq!(state.layer.pending_bonuses(), 0);
    assert_eq!(state.layer.total_multiplier(), landed[0]);
}

#[test]
fn test_collect_rolls_pending_spin_and_stale_resolution_is_ignored() {
    let mut state = row_almost_done();
    let mut rng = rng(2);
    game_tick(&mut state, 1_000, &mut rng);
    assert_eq!(state.layer.pending_bonuses(), 1);

    let outcome = collect(&mut state, &mut rng);
    assert_eq!(outcome.squares, GRID_SIZE as u32);
    assert!(outcome.multiplier >= 1.5);
    assert_eq!(outcome.award, Award::Blue(GRID_SIZE as f64 * outcome.multiplier));

    // The spin for row 0 belonged to the old grid
    assert!(!resolve_row_bonus(&mut state.layer, 0, &mut rng));
    assert!(state.layer.row_bonuses.is_empty());
    let result = game_tick(&mut state, 1_000 + SPIN_DURATION_MS, &mut rng);
    assert!(!result
        .events
        .iter()
        .any(|e| matches!(e, TickEvent::RowBonusResolved { .. })));
}

#[test]
fn test_multiplier_product_counts_spinning_as_one() {
    let mut layer = GridLayer::new();
    layer.row_bonuses.push(RowBonus::resolved(0, 2.0));
    layer.row_bonuses.push(RowBonus::resolved(1, 3.0));
    layer.row_bonuses.push(RowBonus::spinning(2, 500));
    assert_eq!(layer.total_multiplier(), 6.0);
}

#[test]
fn test_collect_ten_squares_at_triple_multiplier() {
    let mut state = GameState::new(0);
    state.layer.total_squares = 10;
    state.layer.current_square_index = 10;
    state.layer.row_bonuses.push(RowBonus::resolved(0, 3.0));
    let mut rng = rng(3);

    let outcome = collect(&mut state, &mut rng);
    assert_eq!(outcome.reward, 30.0);
    assert_eq!(state.currency, 30.0);
    assert_eq!(state.layer.total_squares, 0);
    assert_eq!(state.prestige.last_blue_production, 30.0);
}

#[test]
fn test_full_grid_without_prestige_only_earns_income() {
    let mut state = GameState::new(0);
    state.layer.current_square_index = TOTAL_SQUARES;
    state.layer.total_squares = TOTAL_SQUARES as u32;
    state.upgrades.insert(UpgradeId::ManaGem, 2);
    let mut rng = rng(4);

    let result = game_tick(&mut state, 1_000, &mut rng);
    assert_eq!(result.squares_filled, 0);
    assert_eq!(state.tier(), 0);
    assert!((state.mana - 0.2).abs() < 1e-9);
    assert!((result.mana_gained - 0.2).abs() < 1e-9);
}

#[test]
fn test_passive_generation_pays_share_of_grid_value() {
    let mut state = GameState::new(0);
    state.layer.total_squares = 10;
    state.skills.insert(SkillId::PassiveGeneration);
    let mut rng = rng(5);

    // 10 squares × 1 × 10% per second × 2 s
    let result = game_tick(&mut state, 2_000, &mut rng);
    assert!((result.currency_gained - 2.0).abs() < 1e-9);
}

#[test]
fn test_unlock_event_fires_once() {
    let mut state = GameState::new(0);
    state.currency = 2_000.0;
    let mut rng = rng(6);

    let result = game_tick(&mut state, 100, &mut rng);
    assert!(result.events.iter().any(|e| matches!(
        e,
        TickEvent::UpgradesUnlocked { ids } if ids.contains(&UpgradeId::ManaGem)
    )));

    // Unlocks are permanent even after the balance drops
    state.currency = 0.0;
    let result = game_tick(&mut state, 200, &mut rng);
    assert!(result.events.is_empty());
    assert!(state.unlocked_upgrades.contains(&UpgradeId::ManaGem));
}

#[test]
fn test_combo_hand_scores_and_redeals() {
    let mut state = GameState::new(0);
    state.combos_unlocked = true;
    let mut rng = rng(7);

    for t in 1..=4 {
        let result = game_tick(&mut state, t * 1_000, &mut rng);
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e, TickEvent::ComboScored { .. })));
    }
    let result = game_tick(&mut state, 5_000, &mut rng);
    let scored = result
        .events
        .iter()
        .find_map(|e| match e {
            TickEvent::ComboScored { points, .. } => Some(*points),
            _ => None,
        })
        .expect("fifth card completes the hand");
    assert_eq!(state.combo_points, scored);
    assert!(state.combo.result.is_some());

    // Result stays up for two seconds
    let result = game_tick(&mut state, 6_000, &mut rng);
    assert!(!result.events.contains(&TickEvent::ComboNewHand));
    let result = game_tick(&mut state, 7_000, &mut rng);
    assert!(result.events.contains(&TickEvent::ComboNewHand));
    assert!(state.combo.squares.iter().all(|s| !s.filled && s.color.is_none()));
}

#[test]
fn test_max_level_purchase_is_noop() {
    let mut state = GameState::new(0);
    state.currency = 1_000_000.0;
    state.unlocked_upgrades.insert(UpgradeId::UnlockCombos);
    purchase_upgrade(&mut state, UpgradeId::UnlockCombos).unwrap();
    assert!(state.combos_unlocked);
    let balance = state.currency;

    let err = purchase_upgrade(&mut state, UpgradeId::UnlockCombos).unwrap_err();
    assert_eq!(err, ActionError::MaxLevel(UpgradeId::UnlockCombos, 1));
    assert_eq!(state.currency, balance);
    assert_eq!(state.upgrade_level(UpgradeId::UnlockCombos), 1);
}

#[test]
fn test_skill_prerequisites_enforced() {
    let mut state = GameState::new(0);
    state.prestige.add_currency(0, 1_000.0);

    let err = purchase_skill(&mut state, SkillId::ManaBoost2).unwrap_err();
    assert!(matches!(err, ActionError::MissingPrerequisite { .. }));
    assert_eq!(state.pink(), 1_000.0);

    purchase_skill(&mut state, SkillId::ManaBoost1).unwrap();
    purchase_skill(&mut state, SkillId::ManaBoost2).unwrap();
    assert_eq!(
        purchase_skill(&mut state, SkillId::ManaBoost2),
        Err(ActionError::AlreadyPurchased(SkillId::ManaBoost2))
    );
    assert_eq!(state.pink(), 1_000.0 - 2.0 - 20.0);
}

#[test]
fn test_timed_spell_window_is_half_open() {
    let mut state = GameState::new(0);
    state.mana = 1_000.0;
    let cast = cast_spell(&mut state, SpellId::Haste, 10_000).unwrap();
    let until = cast.active_until.unwrap();

    assert!(is_spell_active(&state, SpellId::Haste, until - 1));
    assert!(!is_spell_active(&state, SpellId::Haste, until));
}

#[test]
fn test_haste_speeds_up_filling() {
    let mut slow = GameState::new(0);
    let mut fast = GameState::new(0);
    fast.mana = 100.0;
    cast_spell(&mut fast, SpellId::Haste, 0).unwrap();
    let mut rng = rng(8);

    game_tick(&mut slow, 5_000, &mut rng);
    game_tick(&mut fast, 5_000, &mut rng);
    assert!(fast.layer.total_squares > slow.layer.total_squares);
}
