//! JSON snapshot of a `GameState`.
//!
//! Field names follow the browser save format (camelCase), and every field
//! has a default so older snapshots still load. Combo fields are kept as raw
//! JSON values and dropped individually when their shape is not recognised.

use super::error::SaveError;
use crate::combo::{ComboSquare, ComboState, ResultDisplay};
use crate::core::constants::SKILL_TABLE_VERSION;
use crate::core::{GameState, PrestigeState, Settings, SpellRecord};
use crate::grid::GridLayer;
use crate::shop::{SkillId, SpellId, UpgradeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeEntry {
    pub id: String,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellEntry {
    pub id: String,
    #[serde(default)]
    pub times_cast: u32,
    #[serde(default)]
    pub active_until: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub id: String,
    #[serde(default)]
    pub purchased: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub layer: Option<GridLayer>,
    pub prestige_level: Option<u32>,
    pub currency: f64,
    pub mana: f64,
    pub upgrades: Vec<UpgradeEntry>,
    pub unlocked_upgrades: Vec<String>,
    pub has_collected: bool,
    pub spells: Vec<SpellEntry>,
    pub last_update: Option<i64>,
    pub prestige_currencies: Vec<f64>,
    pub skills_unlocked: bool,
    pub has_won: bool,
    pub last_blue_square_production: f64,
    pub skills: Vec<SkillEntry>,
    pub skill_table_version: Option<u32>,
    pub combos_unlocked: bool,
    pub combo_points: f64,
    pub combo_squares: Option<serde_json::Value>,
    pub current_combo_square_index: usize,
    pub current_combo_square_fill_progress: f64,
    pub combo_result_display: Option<serde_json::Value>,
    pub timestamp: Option<i64>,
}

/// What happened while turning a snapshot back into a state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Pink refunded for skills bought under an older skill table.
    pub refunded_pink: f64,
    /// Ids in the snapshot that no longer exist.
    pub skipped_ids: Vec<String>,
}

impl SaveData {
    /// Snapshot of `state` taken at `now`.
    pub fn from_state(state: &GameState, now: i64) -> Self {
        let spells = state
            .spells
            .iter()
            .map(|(id, record)| SpellEntry {
                id: id.key().to_string(),
                times_cast: record.times_cast,
                active_until: record.active_until,
            })
            .collect();

        let combo = &state.combo;
        Self {
            layer: Some(state.layer.clone()),
            prestige_level: Some(state.prestige.level),
            currency: state.currency,
            mana: state.mana,
            upgrades: state
                .upgrades
                .iter()
                .map(|(id, level)| UpgradeEntry {
                    id: id.key().to_string(),
                    level: *level,
                })
                .collect(),
            unlocked_upgrades: state
                .unlocked_upgrades
                .iter()
                .map(|id| id.key().to_string())
                .collect(),
            has_collected: state.has_collected,
            spells,
            last_update: Some(state.last_update),
            prestige_currencies: state.prestige.currencies.clone(),
            skills_unlocked: state.skills_unlocked,
            has_won: state.prestige.has_won,
            last_blue_square_production: state.prestige.last_blue_production,
            skills: SkillId::ALL
                .iter()
                .map(|id| SkillEntry {
                    id: id.key().to_string(),
                    purchased: state.has_skill(*id),
                })
                .collect(),
            skill_table_version: Some(SKILL_TABLE_VERSION),
            combos_unlocked: state.combos_unlocked,
            combo_points: state.combo_points,
            combo_squares: serde_json::to_value(&combo.squares).ok(),
            current_combo_square_index: combo.current_index,
            current_combo_square_fill_progress: combo.current_fill_progress,
            combo_result_display: combo
                .result
                .as_ref()
                .and_then(|r| serde_json::to_value(r).ok()),
            timestamp: Some(now),
        }
    }

    /// Rebuilds a state. A missing layer is an error; a missing prestige
    /// level defaults to the base tier.
    pub fn into_state(self, now: i64) -> Result<(GameState, LoadReport), SaveError> {
        let mut layer = self.layer.ok_or(SaveError::MissingField("layer"))?;
        layer.normalize();

        let mut report = LoadReport::default();

        let mut upgrades = BTreeMap::new();
        for entry in &self.upgrades {
            match UpgradeId::from_key(&entry.id) {
                Some(id) => {
                    let level = id.def().max_level.map_or(entry.level, |max| entry.level.min(max));
                    if level > 0 {
                        upgrades.insert(id, level);
                    }
                }
                None => report.skipped_ids.push(entry.id.clone()),
            }
        }

        let mut unlocked_upgrades = BTreeSet::new();
        for key in &self.unlocked_upgrades {
            match UpgradeId::from_key(key) {
                Some(id) => {
                    unlocked_upgrades.insert(id);
                }
                None => report.skipped_ids.push(key.clone()),
            }
        }

        let mut spells = BTreeMap::new();
        for entry in &self.spells {
            match SpellId::from_key(&entry.id) {
                Some(id) => {
                    let active_until = id.def().duration_ms().and(entry.active_until);
                    spells.insert(
                        id,
                        SpellRecord {
                            times_cast: entry.times_cast,
                            active_until,
                        },
                    );
                }
                None => report.skipped_ids.push(entry.id.clone()),
            }
        }

        let mut purchased = BTreeSet::new();
        for entry in &self.skills {
            match SkillId::from_key(&entry.id) {
                Some(id) if entry.purchased => {
                    purchased.insert(id);
                }
                Some(_) => {}
                None => report.skipped_ids.push(entry.id.clone()),
            }
        }

        let mut prestige_currencies = self.prestige_currencies;
        let table_version = self.skill_table_version.unwrap_or(1);
        let skills = if table_version < SKILL_TABLE_VERSION && !purchased.is_empty() {
            report.refunded_pink = purchased.iter().map(|id| id.def().cost).sum();
            if prestige_currencies.is_empty() {
                prestige_currencies.push(0.0);
            }
            prestige_currencies[0] += report.refunded_pink;
            info!(
                from_version = table_version,
                refunded = report.refunded_pink,
                "skill table changed, refunded purchased skills"
            );
            BTreeSet::new()
        } else {
            with_prerequisites(&purchased)
        };

        let combo = restore_combo(
            self.combo_squares,
            self.current_combo_square_index,
            self.current_combo_square_fill_progress,
            self.combo_result_display,
        );

        if !report.skipped_ids.is_empty() {
            warn!(ids = ?report.skipped_ids, "save references unknown ids, skipped");
        }

        let state = GameState {
            layer,
            prestige: PrestigeState {
                level: self.prestige_level.unwrap_or(0),
                currencies: prestige_currencies,
                previous_completed_layer: None,
                is_paused: false,
                transition_ends_at: None,
                has_won: self.has_won,
                last_blue_production: self.last_blue_square_production,
            },
            currency: self.currency,
            mana: self.mana,
            combo_points: self.combo_points,
            combos_unlocked: self.combos_unlocked || upgrades.contains_key(&UpgradeId::UnlockCombos),
            upgrades,
            unlocked_upgrades,
            skills,
            spells,
            combo,
            has_collected: self.has_collected,
            skills_unlocked: self.skills_unlocked,
            last_update: self.last_update.or(self.timestamp).unwrap_or(now),
            settings: Settings::default(),
        };
        Ok((state, report))
    }
}

/// Keeps only skills whose prerequisites are also kept, in table order.
fn with_prerequisites(purchased: &BTreeSet<SkillId>) -> BTreeSet<SkillId> {
    let mut kept = BTreeSet::new();
    for id in SkillId::ALL {
        if purchased.contains(&id) && id.def().prerequisites.iter().all(|p| kept.contains(p)) {
            kept.insert(id);
        }
    }
    kept
}

fn restore_combo(
    squares: Option<serde_json::Value>,
    current_index: usize,
    current_fill_progress: f64,
    result: Option<serde_json::Value>,
) -> ComboState {
    let squares: Option<Vec<ComboSquare>> =
        squares.and_then(|value| serde_json::from_value(value).ok());
    let Some(squares) = squares else {
        return ComboState::new();
    };

    let mut combo = ComboState {
        squares,
        current_index,
        current_fill_progress: if current_fill_progress.is_finite() {
            current_fill_progress.clamp(0.0, 1.0)
        } else {
            0.0
        },
        result: result.and_then(|value| serde_json::from_value::<ResultDisplay>(value).ok()),
    };
    combo.normalize();
    combo
}

/// Pretty JSON export of `state`.
pub fn export_json(state: &GameState, now: i64) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&SaveData::from_state(state, now))?)
}

/// Parses an exported save.
///
/// Rejects text that is not a save, or a save without grid or tier data.
/// Nothing is mutated here; the caller swaps the returned state in.
pub fn import_json(text: &str, now: i64) -> Result<(GameState, LoadReport), SaveError> {
    let data: SaveData = serde_json::from_str(text)?;
    if data.layer.is_none() {
        return Err(SaveError::MissingField("layer"));
    }
    if data.prestige_level.is_none() {
        return Err(SaveError::MissingField("prestigeLevel"));
    }
    data.into_state(now)
}
