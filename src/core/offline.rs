//! Offline progression.
//!
//! Time spent away is replayed through [`game_tick`] on a simulated clock
//! that starts at the last processed tick. Each slice replays
//! `OFFLINE_SPEED_MULTIPLIER` ticks of `TICK_INTERVAL_MS`, so a driver calling
//! [`OfflineCatchUp::step`] once per real tick fast-forwards at 60×. Row
//! bonuses are rolled immediately during replay, so nothing is left spinning
//! when catch-up ends.

use super::constants::{OFFLINE_MIN_ELAPSED_MS, OFFLINE_SPEED_MULTIPLIER, TICK_INTERVAL_MS};
use super::game_state::GameState;
use super::prestige::finish_transition;
use super::tick::{game_tick, TickEvent};
use crate::grid::force_resolve;
use rand::Rng;
use tracing::info;

/// Summary of an offline catch-up run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OfflineReport {
    pub elapsed_ms: i64,
    pub simulated_ms: i64,
    pub ticks: u64,
    pub slices: u32,
    pub squares_filled: u64,
    pub rows_completed: u32,
    pub prestiges: u32,
    pub currency_gained: f64,
    pub mana_gained: f64,
    pub combo_points_gained: f64,
}

/// An in-progress catch-up.
#[derive(Debug, Clone)]
pub struct OfflineCatchUp {
    target: i64,
    cursor: i64,
    report: OfflineReport,
    currency_before: f64,
    mana_before: f64,
    combo_points_before: f64,
}

impl OfflineCatchUp {
    /// Starts catch-up if more than `OFFLINE_MIN_ELAPSED_MS` passed since the
    /// last tick. Returns `None` for shorter gaps.
    pub fn begin<R: Rng>(state: &mut GameState, now: i64, rng: &mut R) -> Option<Self> {
        let elapsed = now - state.last_update;
        if elapsed <= OFFLINE_MIN_ELAPSED_MS {
            return None;
        }

        state.settings.is_processing_offline = true;
        if state.prestige.is_paused {
            finish_transition(state);
        }
        force_resolve(&mut state.layer, rng);

        info!(elapsed_ms = elapsed, "processing offline time");
        Some(Self {
            target: now,
            cursor: state.last_update,
            report: OfflineReport {
                elapsed_ms: elapsed,
                ..OfflineReport::default()
            },
            currency_before: state.currency,
            mana_before: state.mana,
            combo_points_before: state.combo_points,
        })
    }

    pub fn remaining_ms(&self) -> i64 {
        (self.target - self.cursor).max(0)
    }

    pub fn is_done(&self) -> bool {
        self.remaining_ms() == 0
    }

    /// Replays one slice. Returns `true` once all offline time is consumed.
    pub fn step<R: Rng>(&mut self, state: &mut GameState, rng: &mut R) -> bool {
        let slice = (TICK_INTERVAL_MS as i64 * OFFLINE_SPEED_MULTIPLIER as i64).min(self.remaining_ms());
        let slice_end = self.cursor + slice;

        while self.cursor < slice_end {
            self.cursor = (self.cursor + TICK_INTERVAL_MS as i64).min(slice_end);
            let result = game_tick(state, self.cursor, rng);
            self.report.ticks += 1;
            self.report.simulated_ms += result.elapsed_ms;
            self.report.squares_filled += result.squares_filled as u64;
            for event in &result.events {
                match event {
                    TickEvent::RowCompleted { .. } => self.report.rows_completed += 1,
                    TickEvent::TierAdvanced { .. } => self.report.prestiges += 1,
                    _ => {}
                }
            }
        }
        self.report.slices += 1;
        self.is_done()
    }

    /// Consumes the remaining time and closes out catch-up.
    pub fn run_to_completion<R: Rng>(mut self, state: &mut GameState, rng: &mut R) -> OfflineReport {
        while !self.step(state, rng) {}
        self.finish(state)
    }

    /// Clears the offline flag and returns the report.
    pub fn finish(mut self, state: &mut GameState) -> OfflineReport {
        state.settings.is_processing_offline = false;
        state.last_update = state.last_update.max(self.target);

        self.report.currency_gained = state.currency - self.currency_before;
        self.report.mana_gained = state.mana - self.mana_before;
        self.report.combo_points_gained = state.combo_points - self.combo_points_before;

        info!(
            elapsed_ms = self.report.elapsed_ms,
            ticks = self.report.ticks,
            squares = self.report.squares_filled,
            prestiges = self.report.prestiges,
            "offline progress applied"
        );
        self.report
    }
}

/// Replays all time since `state.last_update` up to `now`.
///
/// Returns a default report when the gap is below the offline threshold.
pub fn process_offline_progression<R: Rng>(
    state: &mut GameState,
    now: i64,
    rng: &mut R,
) -> OfflineReport {
    match OfflineCatchUp::begin(state, now, rng) {
        Some(catch_up) => catch_up.run_to_completion(state, rng),
        None => OfflineReport::default(),
    }
}
