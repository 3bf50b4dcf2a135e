//! Manual collection of the live grid.

use super::game_state::GameState;
use super::multipliers::pink_multiplier;
use super::prestige::finish_transition;
use crate::grid::{force_resolve, GridLayer};
use crate::shop::Currency;
use rand::Rng;
use tracing::info;

/// Where a collect's reward went.
#[derive(Debug, Clone, PartialEq)]
pub enum Award {
    Blue(f64),
    Prestige { index: usize, amount: f64 },
    /// Tiers above the top playable tier pay nothing yet.
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectOutcome {
    pub tier: u32,
    pub squares: u32,
    pub multiplier: f64,
    pub reward: f64,
    pub award: Award,
}

/// Cashes in the live grid.
///
/// Pending row bonuses are rolled first, so the payout always uses a
/// finalized multiplier. On tier 0 the grid resets and the tier stays; on any
/// higher tier the run resets back to tier 0.
pub fn collect<R: Rng>(state: &mut GameState, rng: &mut R) -> CollectOutcome {
    let tier = state.tier();
    let squares = state.layer.total_squares;
    force_resolve(&mut state.layer, rng);
    let multiplier = state.layer.total_multiplier();
    let reward = squares as f64 * multiplier;

    let award = match tier {
        0 => {
            state.currency += reward;
            state.prestige.last_blue_production = reward;
            state.layer = GridLayer::new();
            Award::Blue(reward)
        }
        1 => {
            let amount = reward * pink_multiplier(state);
            state.prestige.add_currency(0, amount);
            state.skills_unlocked = true;
            reset_run(state);
            Award::Prestige { index: 0, amount }
        }
        _ => {
            reset_run(state);
            Award::Nothing
        }
    };
    state.has_collected = true;

    info!(tier, squares, multiplier, reward, ?award, "collected");
    CollectOutcome {
        tier,
        squares,
        multiplier,
        reward,
        award,
    }
}

/// Back to an empty blue grid. Upgrades bought with blue squares and all
/// spells are lost. Pink and combo upgrades survive.
fn reset_run(state: &mut GameState) {
    finish_transition(state);
    state.layer = GridLayer::new();
    state.prestige.level = 0;
    state.prestige.last_blue_production = 0.0;
    state.currency = 0.0;
    state.mana = 0.0;
    state.upgrades.retain(|id, _| id.def().currency != Currency::Blue);
    state.spells.clear();
}
