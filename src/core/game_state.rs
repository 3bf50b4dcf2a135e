//! Game state container.
//!
//! One `GameState` holds everything the engine mutates. Callers own it and
//! pass `&mut` into every operation, so a tick can never interleave with a
//! collect or purchase.

use crate::combo::ComboState;
use crate::grid::GridLayer;
use crate::shop::{Currency, SkillId, SpellId, UpgradeId};
use std::collections::{BTreeMap, BTreeSet};

/// Tier progression and the carry-over values between tiers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrestigeState {
    /// 0 = blue grid, 1 = pink grid, 2+ = unrewarded tiers.
    pub level: u32,
    /// Collected prestige currency per tier; index 0 is pink.
    pub currencies: Vec<f64>,
    /// Grid just completed, kept only while the transition is shown.
    pub previous_completed_layer: Option<GridLayer>,
    pub is_paused: bool,
    pub transition_ends_at: Option<i64>,
    pub has_won: bool,
    /// Value of the last blue grid, used for passive income and magical
    /// collect while on higher tiers.
    pub last_blue_production: f64,
}

impl PrestigeState {
    pub fn currency(&self, index: usize) -> f64 {
        self.currencies.get(index).copied().unwrap_or(0.0)
    }

    pub fn add_currency(&mut self, index: usize, amount: f64) {
        if self.currencies.len() <= index {
            self.currencies.resize(index + 1, 0.0);
        }
        self.currencies[index] += amount;
    }
}

/// Cast history for one spell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpellRecord {
    pub times_cast: u32,
    pub active_until: Option<i64>,
}

/// Runtime flags that are never saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Set while offline catch-up is replaying ticks.
    pub is_processing_offline: bool,
    pub debug_speed_multiplier: f64,
    pub debug_disable_slowdown: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_processing_offline: false,
            debug_speed_multiplier: 1.0,
            debug_disable_slowdown: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub layer: GridLayer,
    pub prestige: PrestigeState,

    pub currency: f64,
    pub mana: f64,
    pub combo_points: f64,

    pub upgrades: BTreeMap<UpgradeId, u32>,
    pub unlocked_upgrades: BTreeSet<UpgradeId>,
    pub skills: BTreeSet<SkillId>,
    pub spells: BTreeMap<SpellId, SpellRecord>,
    pub combo: ComboState,

    pub has_collected: bool,
    pub skills_unlocked: bool,
    pub combos_unlocked: bool,

    /// Timestamp (ms) of the last processed tick.
    pub last_update: i64,
    pub settings: Settings,
}

impl GameState {
    /// Fresh game starting at `now`.
    pub fn new(now: i64) -> Self {
        Self {
            layer: GridLayer::new(),
            prestige: PrestigeState::default(),
            currency: 0.0,
            mana: 0.0,
            combo_points: 0.0,
            upgrades: BTreeMap::new(),
            unlocked_upgrades: BTreeSet::new(),
            skills: BTreeSet::new(),
            spells: BTreeMap::new(),
            combo: ComboState::new(),
            has_collected: false,
            skills_unlocked: false,
            combos_unlocked: false,
            last_update: now,
            settings: Settings::default(),
        }
    }

    pub fn tier(&self) -> u32 {
        self.prestige.level
    }

    pub fn upgrade_level(&self, id: UpgradeId) -> u32 {
        self.upgrades.get(&id).copied().unwrap_or(0)
    }

    pub fn has_skill(&self, id: SkillId) -> bool {
        self.skills.contains(&id)
    }

    pub fn spell_times_cast(&self, id: SpellId) -> u32 {
        self.spells.get(&id).map_or(0, |s| s.times_cast)
    }

    pub fn pink(&self) -> f64 {
        self.prestige.currency(0)
    }

    pub fn balance(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Blue => self.currency,
            Currency::Pink => self.pink(),
            Currency::ComboPoints => self.combo_points,
            Currency::Mana => self.mana,
        }
    }

    pub(crate) fn spend(&mut self, currency: Currency, amount: f64) {
        match currency {
            Currency::Blue => self.currency -= amount,
            Currency::Pink => self.prestige.add_currency(0, -amount),
            Currency::ComboPoints => self.combo_points -= amount,
            Currency::Mana => self.mana -= amount,
        }
    }
}
