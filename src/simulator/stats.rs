//! Per-run statistics, accumulated from tick results and player actions.

use crate::core::{Award, CollectOutcome, TickEvent, TickResult};
use serde::Serialize;

/// Final numbers for one simulated run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub final_tier: u32,
    pub highest_tier: u32,
    pub total_ticks: u64,
    pub squares_filled: u64,
    pub rows_completed: u64,
    pub collects: u32,
    pub blue_collected: f64,
    pub pink_earned: f64,
    pub upgrades_bought: u32,
    pub skills_bought: u32,
    pub spells_cast: u32,
    pub combos_scored: u32,
    pub combo_points_earned: f64,
    /// Tick at which each tier was first entered; index 0 is always 0.
    pub tier_reached_at: Vec<u64>,
    pub has_won: bool,
    pub reached_target: bool,
}

/// Running tally for the run in progress.
#[derive(Debug, Default)]
pub(super) struct SimStats {
    pub stats: RunStats,
}

impl SimStats {
    pub fn new() -> Self {
        Self {
            stats: RunStats {
                tier_reached_at: vec![0],
                ..RunStats::default()
            },
        }
    }

    pub fn process_tick(&mut self, result: &TickResult, current_tick: u64) {
        let stats = &mut self.stats;
        stats.squares_filled += result.squares_filled as u64;
        for event in &result.events {
            match event {
                TickEvent::RowCompleted { .. } => stats.rows_completed += 1,
                TickEvent::ComboScored { points, .. } => {
                    stats.combos_scored += 1;
                    stats.combo_points_earned += points;
                }
                TickEvent::TierAdvanced { to_tier, .. } => {
                    if *to_tier > stats.highest_tier {
                        stats.highest_tier = *to_tier;
                        stats.tier_reached_at.push(current_tick);
                    }
                }
                TickEvent::GameWon => stats.has_won = true,
                _ => {}
            }
        }
    }

    pub fn record_collect(&mut self, outcome: &CollectOutcome) {
        self.stats.collects += 1;
        match outcome.award {
            Award::Blue(amount) => self.stats.blue_collected += amount,
            Award::Prestige { amount, .. } => self.stats.pink_earned += amount,
            Award::Nothing => {}
        }
    }

    pub fn finish(mut self, final_tier: u32, total_ticks: u64, target_tier: u32) -> RunStats {
        self.stats.final_tier = final_tier;
        self.stats.total_ticks = total_ticks;
        self.stats.reached_target = self.stats.highest_tier >= target_tier;
        self.stats
    }
}
