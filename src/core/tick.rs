//! Per-tick orchestration.
//!
//! `game_tick()` consumes the wall-clock time elapsed since the previous tick
//! and advances income, the combo mini-grid, and the main grid. It returns a
//! [`TickResult`] describing what happened so drivers can report progress
//! without reaching into the engine.

use super::game_state::GameState;
use super::multipliers::{
    combo_payout_modifiers, fill_speed_multiplier, mana_per_second, passive_base,
    passive_generation_rate,
};
use super::prestige::{finish_transition, perform_prestige, transition_elapsed};
use crate::combo::{advance_combo, ComboAdvance, ComboHand};
use crate::grid::{advance_fill, resolve_due, FillParams};
use crate::shop::{refresh_unlocks, UpgradeId};
use rand::Rng;

/// A single event produced by a game tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    // ── Grid ────────────────────────────────────────────────────
    /// A row filled up. `multiplier` is `None` while its bonus spins.
    RowCompleted { row: usize, multiplier: Option<f64> },

    /// A spinning row bonus landed.
    RowBonusResolved { row: usize, multiplier: f64 },

    // ── Shop ────────────────────────────────────────────────────
    UpgradesUnlocked { ids: Vec<UpgradeId> },

    // ── Combo ───────────────────────────────────────────────────
    ComboScored { hand: ComboHand, points: f64 },

    ComboNewHand,

    // ── Prestige ────────────────────────────────────────────────
    /// The grid was completed and the next tier began.
    TierAdvanced { from_tier: u32, to_tier: u32, reward: f64 },

    /// The top playable tier was completed for the first time.
    GameWon,

    /// The transition pause ended and ticking resumed.
    TransitionFinished,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Events in the order they happened.
    pub events: Vec<TickEvent>,
    /// Milliseconds of game time this tick consumed.
    pub elapsed_ms: i64,
    pub squares_filled: u32,
    pub mana_gained: f64,
    pub currency_gained: f64,
    pub combo_points_gained: f64,
}

/// Processes one tick ending at `now` (Unix ms).
///
/// While a tier transition is showing, nothing advances: the tick only
/// moves `last_update` forward and ends the transition once its window has
/// passed.
pub fn game_tick<R: Rng>(state: &mut GameState, now: i64, rng: &mut R) -> TickResult {
    let mut result = TickResult::default();

    // ── 1. Transition pause ─────────────────────────────────────
    if state.prestige.is_paused {
        if transition_elapsed(state, now) {
            finish_transition(state);
            result.events.push(TickEvent::TransitionFinished);
        }
        state.last_update = now;
        return result;
    }

    let elapsed_ms = (now - state.last_update).max(0);
    let delta = elapsed_ms as f64;
    state.last_update = now;
    result.elapsed_ms = elapsed_ms;

    // ── 2. Land finished spins ──────────────────────────────────
    for (row, multiplier) in resolve_due(&mut state.layer, now, rng) {
        result.events.push(TickEvent::RowBonusResolved { row, multiplier });
    }

    // ── 3. Unlocks ──────────────────────────────────────────────
    let unlocked = refresh_unlocks(state);
    if !unlocked.is_empty() {
        result.events.push(TickEvent::UpgradesUnlocked { ids: unlocked });
    }

    // ── 4. Time-based income ────────────────────────────────────
    let mana = mana_per_second(state) * delta / 1000.0;
    state.mana += mana;
    result.mana_gained = mana;

    let rate = passive_generation_rate(state);
    if rate > 0.0 {
        let passive = passive_base(state) * rate * delta / 1000.0;
        state.currency += passive;
        result.currency_gained = passive;
    }

    // ── 5. Combo mini-grid ──────────────────────────────────────
    if state.combos_unlocked {
        let modifiers = combo_payout_modifiers(state);
        match advance_combo(&mut state.combo, delta, now, modifiers, rng) {
            ComboAdvance::Scored(scored) => {
                state.combo_points += scored.points;
                result.combo_points_gained = scored.points;
                result.events.push(TickEvent::ComboScored {
                    hand: scored.hand,
                    points: scored.points,
                });
            }
            ComboAdvance::NewHand => result.events.push(TickEvent::ComboNewHand),
            ComboAdvance::Idle | ComboAdvance::Filling => {}
        }
    }

    // ── 6. Fill the grid ────────────────────────────────────────
    if state.layer.is_complete() {
        return result;
    }
    let params = FillParams {
        tier: state.tier(),
        fill_speed_multiplier: fill_speed_multiplier(state, now),
        slowdown_disabled: state.settings.debug_disable_slowdown,
        resolve_immediately: state.settings.is_processing_offline,
        now,
    };
    let fill = advance_fill(&mut state.layer, delta, params, rng);
    result.squares_filled = fill.squares_filled;
    for row in fill.rows_completed {
        result.events.push(TickEvent::RowCompleted {
            row: row.row,
            multiplier: row.multiplier,
        });
    }

    // ── 7. Prestige on completion ───────────────────────────────
    if fill.reached_capacity {
        let outcome = perform_prestige(state, now, rng);
        result.events.push(TickEvent::TierAdvanced {
            from_tier: outcome.from_tier,
            to_tier: outcome.to_tier,
            reward: outcome.reward,
        });
        if outcome.won {
            result.events.push(TickEvent::GameWon);
        }
    }

    result
}
