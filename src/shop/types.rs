//! Upgrade, skill, and spell definitions.
//!
//! These tables are read-only. Effects are described as data and interpreted
//! by [`UpgradeEffect::value`] so the tables stay plain constants.

use thiserror::Error;

/// Which balance pays for a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Blue,
    Pink,
    ComboPoints,
    Mana,
}

impl Currency {
    pub fn name(&self) -> &'static str {
        match self {
            Currency::Blue => "blue squares",
            Currency::Pink => "pink squares",
            Currency::ComboPoints => "combo points",
            Currency::Mana => "mana",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Upgrades ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpgradeId {
    FillFaster,
    ManaGem,
    PinkMultiplier,
    UnlockCombos,
    PassiveGeneration,
    ManaBoost,
    FillRate,
    MoreComboPoints,
    LuckyBlue,
    CrazyPink,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 10] = [
        UpgradeId::FillFaster,
        UpgradeId::ManaGem,
        UpgradeId::PinkMultiplier,
        UpgradeId::UnlockCombos,
        UpgradeId::PassiveGeneration,
        UpgradeId::ManaBoost,
        UpgradeId::FillRate,
        UpgradeId::MoreComboPoints,
        UpgradeId::LuckyBlue,
        UpgradeId::CrazyPink,
    ];

    /// Wire id as stored in saves.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::FillFaster => "fill_faster",
            UpgradeId::ManaGem => "mana_gem",
            UpgradeId::PinkMultiplier => "pink_multiplier",
            UpgradeId::UnlockCombos => "unlock_combos",
            UpgradeId::PassiveGeneration => "passive_generation",
            UpgradeId::ManaBoost => "mana_boost",
            UpgradeId::FillRate => "fill_rate",
            UpgradeId::MoreComboPoints => "more_combo_points",
            UpgradeId::LuckyBlue => "lucky_blue",
            UpgradeId::CrazyPink => "crazy_pink",
        }
    }

    pub fn from_key(key: &str) -> Option<UpgradeId> {
        Self::ALL.iter().copied().find(|id| id.key() == key)
    }

    pub fn def(&self) -> &'static UpgradeDef {
        upgrade_def(*self)
    }
}

/// Effect of an upgrade as a function of its level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// `base^level`
    Compounding { base: f64 },
    /// `per_level × level`
    Linear { per_level: f64 },
    /// 1 when owned, 0 otherwise.
    Toggle,
}

impl UpgradeEffect {
    pub fn value(&self, level: u32) -> f64 {
        match self {
            UpgradeEffect::Compounding { base } => base.powi(level as i32),
            UpgradeEffect::Linear { per_level } => per_level * level as f64,
            UpgradeEffect::Toggle => {
                if level > 0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Condition that permanently reveals an upgrade in the shop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnlockRequirement {
    Currency { amount: f64 },
    PrestigeCurrency { index: usize, amount: f64 },
    CombosUnlocked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: &'static str,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub max_level: Option<u32>,
    pub currency: Currency,
    pub effect: UpgradeEffect,
    pub unlock: Option<UnlockRequirement>,
}

impl UpgradeDef {
    /// Cost of buying the level after `current_level`.
    pub fn cost_at(&self, current_level: u32) -> f64 {
        (self.base_cost * self.cost_multiplier.powi(current_level as i32)).floor()
    }

    pub fn is_maxed(&self, level: u32) -> bool {
        self.max_level.map_or(false, |max| level >= max)
    }
}

pub const UPGRADES: [UpgradeDef; 10] = [
    UpgradeDef {
        id: UpgradeId::FillFaster,
        name: "Fill Faster",
        base_cost: 5.0,
        cost_multiplier: 2.0,
        max_level: Some(25),
        currency: Currency::Blue,
        effect: UpgradeEffect::Compounding { base: 1.2 },
        unlock: None,
    },
    UpgradeDef {
        id: UpgradeId::ManaGem,
        name: "Mana Gem",
        base_cost: 2000.0,
        cost_multiplier: 1.2,
        max_level: Some(50),
        currency: Currency::Blue,
        effect: UpgradeEffect::Linear { per_level: 0.1 },
        unlock: Some(UnlockRequirement::Currency { amount: 2000.0 }),
    },
    UpgradeDef {
        id: UpgradeId::PinkMultiplier,
        name: "Pink Multiplier",
        base_cost: 1_000_000.0,
        cost_multiplier: 10.0,
        max_level: Some(5),
        currency: Currency::Blue,
        effect: UpgradeEffect::Compounding { base: 2.0 },
        unlock: Some(UnlockRequirement::PrestigeCurrency { index: 0, amount: 1.0 }),
    },
    UpgradeDef {
        id: UpgradeId::UnlockCombos,
        name: "Unlock Combos",
        base_cost: 10_000.0,
        cost_multiplier: 1.0,
        max_level: Some(1),
        currency: Currency::Blue,
        effect: UpgradeEffect::Toggle,
        unlock: Some(UnlockRequirement::Currency { amount: 10_000.0 }),
    },
    UpgradeDef {
        id: UpgradeId::PassiveGeneration,
        name: "Passive Generation",
        base_cost: 1.0,
        cost_multiplier: 1.0,
        max_level: Some(1),
        currency: Currency::Pink,
        effect: UpgradeEffect::Linear { per_level: 0.1 },
        unlock: Some(UnlockRequirement::PrestigeCurrency { index: 0, amount: 1.0 }),
    },
    UpgradeDef {
        id: UpgradeId::ManaBoost,
        name: "Mana Boost",
        base_cost: 4.0,
        cost_multiplier: 5.0,
        max_level: Some(5),
        currency: Currency::Pink,
        effect: UpgradeEffect::Compounding { base: 5.0 },
        unlock: Some(UnlockRequirement::PrestigeCurrency { index: 0, amount: 1.0 }),
    },
    UpgradeDef {
        id: UpgradeId::FillRate,
        name: "Fill Rate",
        base_cost: 4.0,
        cost_multiplier: 5.0,
        max_level: Some(5),
        currency: Currency::Pink,
        effect: UpgradeEffect::Compounding { base: 5.0 },
        unlock: Some(UnlockRequirement::PrestigeCurrency { index: 0, amount: 1.0 }),
    },
    UpgradeDef {
        id: UpgradeId::MoreComboPoints,
        name: "More Combo Points",
        base_cost: 10.0,
        cost_multiplier: 2.0,
        max_level: Some(20),
        currency: Currency::ComboPoints,
        effect: UpgradeEffect::Compounding { base: 1.5 },
        unlock: Some(UnlockRequirement::CombosUnlocked),
    },
    UpgradeDef {
        id: UpgradeId::LuckyBlue,
        name: "Lucky Blue",
        base_cost: 100.0,
        cost_multiplier: 1.0,
        max_level: Some(1),
        currency: Currency::ComboPoints,
        effect: UpgradeEffect::Toggle,
        unlock: Some(UnlockRequirement::CombosUnlocked),
    },
    UpgradeDef {
        id: UpgradeId::CrazyPink,
        name: "Crazy Pink",
        base_cost: 500.0,
        cost_multiplier: 1.0,
        max_level: Some(1),
        currency: Currency::ComboPoints,
        effect: UpgradeEffect::Toggle,
        unlock: Some(UnlockRequirement::CombosUnlocked),
    },
];

pub fn upgrade_def(id: UpgradeId) -> &'static UpgradeDef {
    // UPGRADES is declared in UpgradeId::ALL order
    &UPGRADES[id as usize]
}

// ── Skills ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkillId {
    PassiveGeneration,
    ManaBoost1,
    ManaBoost2,
    ManaBoost3,
    FillRate1,
    FillRate2,
    FillRate3,
}

impl SkillId {
    pub const ALL: [SkillId; 7] = [
        SkillId::PassiveGeneration,
        SkillId::ManaBoost1,
        SkillId::ManaBoost2,
        SkillId::ManaBoost3,
        SkillId::FillRate1,
        SkillId::FillRate2,
        SkillId::FillRate3,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SkillId::PassiveGeneration => "passive_generation",
            SkillId::ManaBoost1 => "mana_boost_1",
            SkillId::ManaBoost2 => "mana_boost_2",
            SkillId::ManaBoost3 => "mana_boost_3",
            SkillId::FillRate1 => "fill_rate_1",
            SkillId::FillRate2 => "fill_rate_2",
            SkillId::FillRate3 => "fill_rate_3",
        }
    }

    pub fn from_key(key: &str) -> Option<SkillId> {
        Self::ALL.iter().copied().find(|id| id.key() == key)
    }

    pub fn def(&self) -> &'static SkillDef {
        &SKILLS[*self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    /// Fraction of current production generated per second.
    PassiveGeneration(f64),
    ManaMultiplier(f64),
    FillSpeedMultiplier(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillDef {
    pub id: SkillId,
    pub name: &'static str,
    /// Paid in pink squares.
    pub cost: f64,
    pub prerequisites: &'static [SkillId],
    pub effect: SkillEffect,
}

pub const SKILLS: [SkillDef; 7] = [
    SkillDef {
        id: SkillId::PassiveGeneration,
        name: "Passive Generation",
        cost: 1.0,
        prerequisites: &[],
        effect: SkillEffect::PassiveGeneration(0.10),
    },
    SkillDef {
        id: SkillId::ManaBoost1,
        name: "Mana Boost I",
        cost: 2.0,
        prerequisites: &[],
        effect: SkillEffect::ManaMultiplier(5.0),
    },
    SkillDef {
        id: SkillId::ManaBoost2,
        name: "Mana Boost II",
        cost: 20.0,
        prerequisites: &[SkillId::ManaBoost1],
        effect: SkillEffect::ManaMultiplier(10.0),
    },
    SkillDef {
        id: SkillId::ManaBoost3,
        name: "Mana Boost III",
        cost: 100.0,
        prerequisites: &[SkillId::ManaBoost2],
        effect: SkillEffect::ManaMultiplier(20.0),
    },
    SkillDef {
        id: SkillId::FillRate1,
        name: "Fill Rate I",
        cost: 2.0,
        prerequisites: &[],
        effect: SkillEffect::FillSpeedMultiplier(3.0),
    },
    SkillDef {
        id: SkillId::FillRate2,
        name: "Fill Rate II",
        cost: 100.0,
        prerequisites: &[SkillId::FillRate1],
        effect: SkillEffect::FillSpeedMultiplier(10.0),
    },
    SkillDef {
        id: SkillId::FillRate3,
        name: "Fill Rate III",
        cost: 5000.0,
        prerequisites: &[SkillId::FillRate2],
        effect: SkillEffect::FillSpeedMultiplier(100.0),
    },
];

// ── Spells ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpellId {
    Haste,
    MagicalCollect,
    FasterSquares,
}

impl SpellId {
    pub const ALL: [SpellId; 3] = [SpellId::Haste, SpellId::MagicalCollect, SpellId::FasterSquares];

    pub fn key(&self) -> &'static str {
        match self {
            SpellId::Haste => "haste",
            SpellId::MagicalCollect => "magical_collect",
            SpellId::FasterSquares => "faster_squares",
        }
    }

    pub fn from_key(key: &str) -> Option<SpellId> {
        Self::ALL.iter().copied().find(|id| id.key() == key)
    }

    pub fn def(&self) -> &'static SpellDef {
        &SPELLS[*self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpellEffect {
    /// Fill speed × `factor` until the duration runs out.
    TimedFillSpeed { factor: f64, duration_ms: i64 },
    /// Fill speed × `factor^times_cast`, forever.
    StackingFillSpeed { factor: f64 },
    /// Pays out the grid's current value without resetting it.
    InstantCollect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpellDef {
    pub id: SpellId,
    pub name: &'static str,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub effect: SpellEffect,
}

impl SpellDef {
    pub fn duration_ms(&self) -> Option<i64> {
        match self.effect {
            SpellEffect::TimedFillSpeed { duration_ms, .. } => Some(duration_ms),
            _ => None,
        }
    }

    /// Mana cost of the next cast.
    pub fn cost_at(&self, times_cast: u32) -> f64 {
        (self.base_cost * self.cost_multiplier.powi(times_cast as i32)).floor()
    }
}

pub const SPELLS: [SpellDef; 3] = [
    SpellDef {
        id: SpellId::Haste,
        name: "Haste",
        base_cost: 20.0,
        cost_multiplier: 2.0,
        effect: SpellEffect::TimedFillSpeed {
            factor: 10.0,
            duration_ms: 30_000,
        },
    },
    SpellDef {
        id: SpellId::MagicalCollect,
        name: "Magical Collect",
        base_cost: 50.0,
        cost_multiplier: 2.0,
        effect: SpellEffect::InstantCollect,
    },
    SpellDef {
        id: SpellId::FasterSquares,
        name: "Faster Squares",
        base_cost: 100.0,
        cost_multiplier: 2.0,
        effect: SpellEffect::StackingFillSpeed { factor: 2.0 },
    },
];

// ── Errors ──────────────────────────────────────────────────────

/// Why a purchase or cast was refused. State is never changed on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("{0:?} is not unlocked yet")]
    Locked(UpgradeId),
    #[error("{0:?} is already at max level {1}")]
    MaxLevel(UpgradeId, u32),
    #[error("not enough {currency}: need {cost}, have {balance}")]
    InsufficientFunds {
        currency: Currency,
        cost: f64,
        balance: f64,
    },
    #[error("skill {0:?} is already purchased")]
    AlreadyPurchased(SkillId),
    #[error("skill {skill:?} requires {missing:?}")]
    MissingPrerequisite { skill: SkillId, missing: SkillId },
}
