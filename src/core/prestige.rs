//! Tier transitions.
//!
//! Completing a grid promotes the player one tier. The finished grid is kept
//! for the transition display and the engine pauses until the transition
//! window closes. During offline catch-up the transition completes at once.

use super::constants::{TOP_PLAYABLE_TIER, TRANSITION_DURATION_MS};
use super::game_state::GameState;
use crate::grid::{force_resolve, GridLayer};
use rand::Rng;
use tracing::info;

/// What a prestige transition did.
#[derive(Debug, Clone, PartialEq)]
pub struct PrestigeOutcome {
    pub from_tier: u32,
    pub to_tier: u32,
    /// Squares × finalized multiplier of the grid that was completed.
    pub reward: f64,
    /// True if this transition set `has_won` for the first time.
    pub won: bool,
}

/// Promotes the current grid to the next tier.
pub fn perform_prestige<R: Rng>(state: &mut GameState, now: i64, rng: &mut R) -> PrestigeOutcome {
    let from_tier = state.prestige.level;
    let fast_forward = state.settings.is_processing_offline;

    force_resolve(&mut state.layer, rng);
    let reward = state.layer.potential_reward();
    if from_tier == 0 && reward > 0.0 {
        state.prestige.last_blue_production = reward;
    }

    let completed = std::mem::replace(&mut state.layer, GridLayer::new_prefilled());
    state.prestige.level += 1;

    let won = from_tier >= TOP_PLAYABLE_TIER && !state.prestige.has_won;
    if from_tier >= TOP_PLAYABLE_TIER {
        state.prestige.has_won = true;
    }

    if fast_forward {
        finish_transition(state);
    } else {
        state.prestige.is_paused = true;
        state.prestige.previous_completed_layer = Some(completed);
        state.prestige.transition_ends_at = Some(now + TRANSITION_DURATION_MS);
    }

    info!(
        from_tier,
        to_tier = state.prestige.level,
        reward,
        fast_forward,
        "grid completed, advancing tier"
    );

    PrestigeOutcome {
        from_tier,
        to_tier: state.prestige.level,
        reward,
        won,
    }
}

/// True once the transition window has closed.
pub fn transition_elapsed(state: &GameState, now: i64) -> bool {
    state
        .prestige
        .transition_ends_at
        .map_or(true, |ends_at| now >= ends_at)
}

/// Resumes ticking and drops the transition snapshot.
pub fn finish_transition(state: &mut GameState) {
    state.prestige.is_paused = false;
    state.prestige.previous_completed_layer = None;
    state.prestige.transition_ends_at = None;
}
