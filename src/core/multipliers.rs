//! Aggregated modifiers. Every value is recomputed from state on demand.

use super::game_state::GameState;
use crate::combo::PayoutModifiers;
use crate::shop::{SkillEffect, SpellEffect, SpellId, UpgradeId};

/// Effect of `id` at its current level, or `None` when not owned.
pub fn upgrade_effect(state: &GameState, id: UpgradeId) -> Option<f64> {
    match state.upgrade_level(id) {
        0 => None,
        level => Some(id.def().effect.value(level)),
    }
}

fn upgrade_multiplier(state: &GameState, id: UpgradeId) -> f64 {
    upgrade_effect(state, id).unwrap_or(1.0)
}

pub fn is_spell_active(state: &GameState, id: SpellId, now: i64) -> bool {
    state
        .spells
        .get(&id)
        .and_then(|s| s.active_until)
        .map_or(false, |until| now < until)
}

/// Product of timed and stacking spell speed effects.
pub fn spell_fill_speed_multiplier(state: &GameState, now: i64) -> f64 {
    let mut multiplier = 1.0;
    for id in SpellId::ALL {
        match id.def().effect {
            SpellEffect::TimedFillSpeed { factor, .. } if is_spell_active(state, id, now) => {
                multiplier *= factor;
            }
            SpellEffect::StackingFillSpeed { factor } => {
                multiplier *= factor.powi(state.spell_times_cast(id) as i32);
            }
            _ => {}
        }
    }
    multiplier
}

fn skill_fill_speed_multiplier(state: &GameState) -> f64 {
    state
        .skills
        .iter()
        .filter_map(|id| match id.def().effect {
            SkillEffect::FillSpeedMultiplier(m) => Some(m),
            _ => None,
        })
        .product()
}

/// Everything that speeds up square filling, debug override included.
pub fn fill_speed_multiplier(state: &GameState, now: i64) -> f64 {
    upgrade_multiplier(state, UpgradeId::FillFaster)
        * upgrade_multiplier(state, UpgradeId::FillRate)
        * skill_fill_speed_multiplier(state)
        * spell_fill_speed_multiplier(state, now)
        * state.settings.debug_speed_multiplier
}

pub fn mana_per_second(state: &GameState) -> f64 {
    let base = upgrade_effect(state, UpgradeId::ManaGem).unwrap_or(0.0);
    let skills: f64 = state
        .skills
        .iter()
        .filter_map(|id| match id.def().effect {
            SkillEffect::ManaMultiplier(m) => Some(m),
            _ => None,
        })
        .product();
    base * skills * upgrade_multiplier(state, UpgradeId::ManaBoost)
}

/// Multiplier applied to pink squares on a tier-1 collect.
pub fn pink_multiplier(state: &GameState) -> f64 {
    upgrade_multiplier(state, UpgradeId::PinkMultiplier)
}

/// Fraction of current production earned per second without collecting.
pub fn passive_generation_rate(state: &GameState) -> f64 {
    let skills: f64 = state
        .skills
        .iter()
        .filter_map(|id| match id.def().effect {
            SkillEffect::PassiveGeneration(rate) => Some(rate),
            _ => None,
        })
        .sum();
    skills + upgrade_effect(state, UpgradeId::PassiveGeneration).unwrap_or(0.0)
}

/// Blue value that passive income and magical collect are based on.
pub fn passive_base(state: &GameState) -> f64 {
    if state.tier() == 0 {
        state.layer.potential_reward()
    } else {
        state.prestige.last_blue_production
    }
}

pub fn combo_points_multiplier(state: &GameState) -> f64 {
    upgrade_multiplier(state, UpgradeId::MoreComboPoints)
}

pub fn combo_payout_modifiers(state: &GameState) -> PayoutModifiers {
    PayoutModifiers {
        points_multiplier: combo_points_multiplier(state),
        lucky_blue: state.upgrade_level(UpgradeId::LuckyBlue) > 0,
        crazy_pink: state.upgrade_level(UpgradeId::CrazyPink) > 0,
    }
}
