//! Main simulation runner using CoreGame for real game mechanics.
//!
//! The auto-player sits on top of the same engine calls a human driver
//! makes: tick, collect, purchase, cast. Statistics are tracked externally
//! from `TickResult` events and collect outcomes.

use super::config::SimConfig;
use super::report::SimReport;
use super::stats::{RunStats, SimStats};
use crate::core::constants::TOP_PLAYABLE_TIER;
use crate::core::multipliers::{fill_speed_multiplier, is_spell_active};
use crate::core::progression::fill_duration;
use crate::core::{CoreGame, GameLoop, GameState};
use crate::shop::{
    can_cast_spell, can_purchase_upgrade, Currency, SkillId, SpellId, UpgradeId,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, &mut rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Tier {} (best {}), Collects {}, Blue {:.0}, Pink {:.1}, Ticks {}",
                run_idx + 1,
                config.num_runs,
                run.final_tier,
                run.highest_tier,
                run.collects,
                run.blue_collected,
                run.pink_earned,
                run.total_ticks
            );
        }
        all_runs.push(run);
    }

    SimReport::from_runs(all_runs, config.target_tier, config.max_ticks_per_run)
}

/// Simulate a single run from a fresh game until the target tier or timeout.
fn simulate_single_run(config: &SimConfig, rng: &mut ChaCha8Rng) -> RunStats {
    let mut game = CoreGame::new(0);
    game.state_mut().settings.debug_speed_multiplier = config.speed_multiplier;

    let mut stats = SimStats::new();
    let mut ticks: u64 = 0;

    while ticks < config.max_ticks_per_run && game.state().tier() < config.target_tier {
        if !game.state().prestige.is_paused {
            if config.auto_buy {
                stats.stats.upgrades_bought += buy_upgrades(&mut game);
                stats.stats.skills_bought += buy_skills(&mut game);
            }
            if config.auto_cast {
                stats.stats.spells_cast += cast_spells(&mut game);
            }
            if should_collect(game.state(), game.now(), config.collect_patience_ms) {
                let outcome = game.collect(rng);
                stats.record_collect(&outcome);
            }
        }

        let result = game.tick(rng);
        stats.process_tick(&result, ticks);
        ticks += 1;
    }

    let final_tier = game.state().tier();
    stats.finish(final_tier, ticks, config.target_tier)
}

/// Buys the cheapest affordable upgrade until nothing is affordable.
fn buy_upgrades(game: &mut CoreGame) -> u32 {
    let mut bought = 0;
    loop {
        let cheapest = UpgradeId::ALL
            .iter()
            .filter_map(|&id| can_purchase_upgrade(game.state(), id).ok().map(|cost| (id, cost)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match cheapest {
            Some((id, _)) if game.purchase_upgrade(id).is_ok() => bought += 1,
            _ => return bought,
        }
    }
}

/// Skills in table order, so prerequisites come first.
fn buy_skills(game: &mut CoreGame) -> u32 {
    SkillId::ALL
        .iter()
        .filter(|&&id| game.purchase_skill(id).is_ok())
        .count() as u32
}

fn cast_spells(game: &mut CoreGame) -> u32 {
    let mut cast = 0;
    for id in SpellId::ALL {
        let timed_and_running =
            id.def().duration_ms().is_some() && is_spell_active(game.state(), id, game.now());
        if timed_and_running || can_cast_spell(game.state(), id).is_err() {
            continue;
        }
        if game.cast_spell(id).is_ok() {
            cast += 1;
        }
    }
    cast
}

/// Collects once the square in progress would outlast `patience_ms`.
///
/// On the blue tier the player stops collecting when no blue upgrade is left
/// to buy, and waits out the grid to reach the next tier instead.
fn should_collect(state: &GameState, now: i64, patience_ms: f64) -> bool {
    let layer = &state.layer;
    if layer.total_squares == 0 || layer.is_complete() {
        return false;
    }
    let tier = state.tier();
    if tier > TOP_PLAYABLE_TIER {
        return false;
    }
    if tier == 0 && !blue_upgrades_remaining(state) {
        return false;
    }

    let duration = fill_duration(
        tier,
        layer.current_square_index,
        fill_speed_multiplier(state, now),
        None,
        state.settings.debug_disable_slowdown,
    );
    let remaining = duration * (1.0 - layer.current_square_fill_progress);
    remaining > patience_ms
}

fn blue_upgrades_remaining(state: &GameState) -> bool {
    UpgradeId::ALL.iter().any(|&id| {
        let def = id.def();
        def.currency == Currency::Blue && !def.is_maxed(state.upgrade_level(id))
    })
}
