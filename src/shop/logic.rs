//! Purchases, skill buys, and spell casts.
//!
//! Every action validates first and mutates only on success, so a rejected
//! action leaves the state exactly as it was.

use super::types::*;
use crate::core::game_state::{GameState, SpellRecord};
use crate::core::multipliers::passive_base;
use tracing::debug;

/// Cost of the next level of `id` for this state.
pub fn upgrade_cost(state: &GameState, id: UpgradeId) -> f64 {
    id.def().cost_at(state.upgrade_level(id))
}

pub fn is_upgrade_unlocked(state: &GameState, id: UpgradeId) -> bool {
    id.def().unlock.is_none() || state.unlocked_upgrades.contains(&id)
}

fn requirement_met(state: &GameState, requirement: &UnlockRequirement) -> bool {
    match *requirement {
        UnlockRequirement::Currency { amount } => state.currency >= amount,
        UnlockRequirement::PrestigeCurrency { index, amount } => {
            state.prestige.currency(index) >= amount
        }
        UnlockRequirement::CombosUnlocked => state.combos_unlocked,
    }
}

/// Adds every upgrade whose requirement is now met. Unlocks never revert.
///
/// Returns the ids unlocked by this call.
pub fn refresh_unlocks(state: &mut GameState) -> Vec<UpgradeId> {
    let newly: Vec<UpgradeId> = UPGRADES
        .iter()
        .filter(|def| !state.unlocked_upgrades.contains(&def.id))
        .filter(|def| def.unlock.as_ref().map_or(false, |r| requirement_met(state, r)))
        .map(|def| def.id)
        .collect();
    state.unlocked_upgrades.extend(newly.iter().copied());
    newly
}

/// Checks a purchase without performing it. Returns the cost.
pub fn can_purchase_upgrade(state: &GameState, id: UpgradeId) -> Result<f64, ActionError> {
    let def = id.def();
    if !is_upgrade_unlocked(state, id) {
        return Err(ActionError::Locked(id));
    }
    let level = state.upgrade_level(id);
    if def.is_maxed(level) {
        return Err(ActionError::MaxLevel(id, level));
    }
    let cost = def.cost_at(level);
    let balance = state.balance(def.currency);
    if balance < cost {
        return Err(ActionError::InsufficientFunds {
            currency: def.currency,
            cost,
            balance,
        });
    }
    Ok(cost)
}

/// Buys one level of `id`. Returns the new level.
pub fn purchase_upgrade(state: &mut GameState, id: UpgradeId) -> Result<u32, ActionError> {
    let cost = can_purchase_upgrade(state, id)?;
    let currency = id.def().currency;
    state.spend(currency, cost);
    let level = state.upgrades.entry(id).or_insert(0);
    *level += 1;
    let level = *level;

    if id == UpgradeId::UnlockCombos {
        state.combos_unlocked = true;
    }
    debug!(upgrade = id.key(), level, cost, %currency, "upgrade purchased");
    Ok(level)
}

pub fn can_purchase_skill(state: &GameState, id: SkillId) -> Result<f64, ActionError> {
    let def = id.def();
    if state.has_skill(id) {
        return Err(ActionError::AlreadyPurchased(id));
    }
    let balance = state.pink();
    if balance < def.cost {
        return Err(ActionError::InsufficientFunds {
            currency: Currency::Pink,
            cost: def.cost,
            balance,
        });
    }
    if let Some(missing) = def.prerequisites.iter().find(|p| !state.has_skill(**p)) {
        return Err(ActionError::MissingPrerequisite {
            skill: id,
            missing: *missing,
        });
    }
    Ok(def.cost)
}

pub fn purchase_skill(state: &mut GameState, id: SkillId) -> Result<(), ActionError> {
    let cost = can_purchase_skill(state, id)?;
    state.spend(Currency::Pink, cost);
    state.skills.insert(id);
    debug!(skill = id.key(), cost, "skill purchased");
    Ok(())
}

/// Mana cost of the next cast of `id`.
pub fn spell_cost(state: &GameState, id: SpellId) -> f64 {
    id.def().cost_at(state.spell_times_cast(id))
}

pub fn can_cast_spell(state: &GameState, id: SpellId) -> Result<f64, ActionError> {
    let cost = spell_cost(state, id);
    if state.mana < cost {
        return Err(ActionError::InsufficientFunds {
            currency: Currency::Mana,
            cost,
            balance: state.mana,
        });
    }
    Ok(cost)
}

/// Result of a successful cast.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellCast {
    pub cost: f64,
    pub times_cast: u32,
    pub active_until: Option<i64>,
    /// Blue squares granted immediately (magical collect).
    pub granted: f64,
}

/// Casts `id` at `now`. Timed spells have their expiry set to `now + duration`.
pub fn cast_spell(state: &mut GameState, id: SpellId, now: i64) -> Result<SpellCast, ActionError> {
    let cost = can_cast_spell(state, id)?;
    let def = id.def();

    let granted = match def.effect {
        SpellEffect::InstantCollect => passive_base(state),
        _ => 0.0,
    };

    state.mana -= cost;
    state.currency += granted;

    let record = state.spells.entry(id).or_insert_with(SpellRecord::default);
    record.times_cast += 1;
    if let Some(duration) = def.duration_ms() {
        record.active_until = Some(now + duration);
    }
    let cast = SpellCast {
        cost,
        times_cast: record.times_cast,
        active_until: record.active_until,
        granted,
    };

    debug!(spell = id.key(), cost, granted, "spell cast");
    Ok(cast)
}
