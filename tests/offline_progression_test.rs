//! Offline catch-up replays absences through the regular tick and never
//! leaves a row bonus spinning.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squares::core::constants::{GRID_SIZE, OFFLINE_MIN_ELAPSED_MS};
use squares::core::{
    game_tick, process_offline_progression, CoreGame, GameLoop, GameState, OfflineCatchUp,
};

/// Squares that take 100 ms each, so 12 s of replay completes many rows.
fn quick_rows_state() -> GameState {
    let mut state = GameState::new(0);
    state.settings.debug_disable_slowdown = true;
    state.settings.debug_speed_multiplier = 10.0;
    state
}

#[test]
fn test_twelve_seconds_resolves_every_bonus() {
    let mut state = quick_rows_state();
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let report = process_offline_progression(&mut state, 12_000, &mut rng);

    assert_eq!(report.elapsed_ms, 12_000);
    assert_eq!(report.simulated_ms, 12_000);
    assert_eq!(report.ticks, 120);
    assert_eq!(report.slices, 2);
    assert!(report.rows_completed >= 9);
    assert_eq!(report.rows_completed, state.layer.completed_rows);
    assert_eq!(state.layer.pending_bonuses(), 0);
    assert!(state.layer.row_bonuses.iter().all(|b| !b.is_spinning));
    assert!(!state.settings.is_processing_offline);
    assert_eq!(state.last_update, 12_000);
}

#[test]
fn test_replay_matches_live_ticks_for_squares() {
    let mut offline = quick_rows_state();
    let mut live = quick_rows_state();
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    process_offline_progression(&mut offline, 9_000, &mut rng);
    for t in 1..=90 {
        game_tick(&mut live, t * 100, &mut rng);
    }

    assert_eq!(offline.layer.total_squares, live.layer.total_squares);
    assert_eq!(offline.layer.completed_rows, live.layer.completed_rows);
}

#[test]
fn test_gap_at_threshold_is_not_offline() {
    let mut state = GameState::new(1_000);
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let report = process_offline_progression(&mut state, 1_000 + OFFLINE_MIN_ELAPSED_MS, &mut rng);
    assert_eq!(report.ticks, 0);
    assert_eq!(state.last_update, 1_000);
}

#[test]
fn test_offline_prestige_skips_transition_pause() {
    let mut state = GameState::new(0);
    state.settings.debug_disable_slowdown = true;
    state.settings.debug_speed_multiplier = 1e9;
    let mut rng = ChaCha8Rng::seed_from_u64(14);

    let report = process_offline_progression(&mut state, 6_000, &mut rng);
    assert!(report.prestiges >= 1);
    assert!(state.tier() >= 1);
    assert!(!state.prestige.is_paused);
    assert!(state.prestige.previous_completed_layer.is_none());
    assert!(state.prestige.last_blue_production > 0.0);
}

#[test]
fn test_stepwise_catch_up_runs_in_slices() {
    let mut state = quick_rows_state();
    let mut rng = ChaCha8Rng::seed_from_u64(15);

    let mut catch_up = OfflineCatchUp::begin(&mut state, 18_000, &mut rng).unwrap();
    let mut steps = 0;
    while !catch_up.step(&mut state, &mut rng) {
        steps += 1;
        assert!(state.settings.is_processing_offline);
    }
    assert_eq!(steps, 2);
    let report = catch_up.finish(&mut state);
    assert_eq!(report.slices, 3);
    assert_eq!(state.layer.pending_bonuses(), 0);
    assert!(!state.settings.is_processing_offline);
}

#[test]
fn test_core_game_resumes_after_catch_up() {
    let mut state = quick_rows_state();
    let mut rng = ChaCha8Rng::seed_from_u64(16);
    process_offline_progression(&mut state, 7_000, &mut rng);

    let mut game = CoreGame::from_state(state);
    assert_eq!(game.now(), 7_000);
    let before = game.state().layer.total_squares;
    for _ in 0..20 {
        game.tick(&mut rng);
    }
    assert!(game.state().layer.total_squares > before);
    assert!(game.state().layer.total_squares as usize <= GRID_SIZE * GRID_SIZE);
}
