//! Headless terminal driver.
//!
//! Loads the save, replays offline time, then ticks every 100 ms and
//! autosaves every 3 seconds. One-shot commands cover collecting, shopping,
//! export, import, and reset.

use rand::rngs::ThreadRng;
use squares::build_info;
use squares::core::clock::now_millis;
use squares::core::constants::{AUTOSAVE_INTERVAL_MS, TICK_INTERVAL_MS};
use squares::core::multipliers::fill_speed_multiplier;
use squares::core::progression::fill_duration;
use squares::core::{
    collect, game_tick, process_offline_progression, Award, GameState, OfflineCatchUp,
    OfflineReport, TickEvent,
};
use squares::persistence::{
    export_json, import_json, load_or_default, save_game, SaveError, SaveManager,
};
use squares::shop::{cast_spell, purchase_skill, purchase_upgrade, SkillId, SpellId, UpgradeId};
use std::io;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("run");

    match command {
        "--version" | "-v" => {
            println!(
                "squares {} ({})",
                build_info::BUILD_DATE,
                build_info::BUILD_COMMIT
            );
            return Ok(());
        }
        "--help" | "-h" => {
            print_help();
            return Ok(());
        }
        _ => {}
    }

    init_logging();
    let mut manager = SaveManager::new().map_err(to_io)?;
    let mut rng = rand::thread_rng();

    match command {
        "run" => {
            let seconds = flag_value(&args, "--seconds");
            run(&mut manager, &mut rng, seconds)
        }
        "status" => {
            let state = load_and_catch_up(&manager, &mut rng);
            print_status(&state, now_millis());
            persist(&mut manager, &state)
        }
        "collect" => {
            let mut state = load_and_catch_up(&manager, &mut rng);
            let outcome = collect(&mut state, &mut rng);
            match outcome.award {
                Award::Blue(amount) => println!("Collected {:.0} blue squares.", amount),
                Award::Prestige { amount, .. } => println!("Collected {:.1} pink squares.", amount),
                Award::Nothing => println!("This tier pays nothing yet. Run reset to tier 0."),
            }
            persist(&mut manager, &state)
        }
        "buy" | "skill" | "cast" => {
            let Some(key) = args.get(2) else {
                eprintln!("Usage: squares {} <id>", command);
                std::process::exit(1);
            };
            let mut state = load_and_catch_up(&manager, &mut rng);
            let result = shop_action(&mut state, command, key);
            match result {
                Ok(message) => println!("{}", message),
                Err(message) => {
                    eprintln!("{}", message);
                    std::process::exit(1);
                }
            }
            persist(&mut manager, &state)
        }
        "export" => {
            let state = load_and_catch_up(&manager, &mut rng);
            let json = export_json(&state, now_millis()).map_err(to_io)?;
            match args.get(2) {
                Some(path) => {
                    std::fs::write(path, json)?;
                    println!("Exported to {}", path);
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        "import" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: squares import <file>");
                std::process::exit(1);
            };
            let text = std::fs::read_to_string(path)?;
            match import_json(&text, now_millis()) {
                Ok((state, report)) => {
                    if report.refunded_pink > 0.0 {
                        println!("Refunded {:.0} pink for outdated skills.", report.refunded_pink);
                    }
                    println!("Import successful.");
                    persist(&mut manager, &state)
                }
                Err(e) => {
                    eprintln!("Import failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        "reset" => {
            manager.delete().map_err(to_io)?;
            println!("Save deleted: {}", manager.path().display());
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'squares --help' for usage.");
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("Squares - idle grid filler\n");
    println!("Usage: squares [command]\n");
    println!("Commands:");
    println!("  run [--seconds N]  Tick in the foreground (default command)");
    println!("  status             Catch up and show the current state");
    println!("  collect            Cash in the current grid");
    println!("  buy <upgrade>      Buy one level of an upgrade");
    println!("  skill <skill>      Buy a skill with pink squares");
    println!("  cast <spell>       Cast a spell with mana");
    println!("  export [file]      Write the save as JSON");
    println!("  import <file>      Replace the save with a JSON export");
    println!("  reset              Delete the save");
    println!("  --version          Show version information");
    println!("  --help             Show this help message");
    println!();
    println!("Set RUST_LOG=debug for detailed logs.");
}

fn init_logging() {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn to_io(e: SaveError) -> io::Error {
    match e {
        SaveError::Io(inner) => inner,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<u64> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1)?.parse().ok()
}

fn load_and_catch_up(manager: &SaveManager, rng: &mut ThreadRng) -> GameState {
    let now = now_millis();
    let (mut state, _) = load_or_default(manager, now);
    let report = process_offline_progression(&mut state, now, rng);
    if report.ticks == 0 {
        // Gaps under the offline threshold are an ordinary tick.
        game_tick(&mut state, now, rng);
    }
    print_offline_report(&report);
    state
}

fn persist(manager: &mut SaveManager, state: &GameState) -> io::Result<()> {
    save_game(manager, state, now_millis()).map_err(to_io)
}

fn shop_action(state: &mut GameState, command: &str, key: &str) -> Result<String, String> {
    match command {
        "buy" => {
            let id = UpgradeId::from_key(key).ok_or_else(|| format!("Unknown upgrade: {}", key))?;
            let level = purchase_upgrade(state, id).map_err(|e| e.to_string())?;
            Ok(format!("{} is now level {}.", id.def().name, level))
        }
        "skill" => {
            let id = SkillId::from_key(key).ok_or_else(|| format!("Unknown skill: {}", key))?;
            purchase_skill(state, id).map_err(|e| e.to_string())?;
            Ok(format!("Learned {}.", id.def().name))
        }
        _ => {
            let id = SpellId::from_key(key).ok_or_else(|| format!("Unknown spell: {}", key))?;
            let cast = cast_spell(state, id, now_millis()).map_err(|e| e.to_string())?;
            Ok(format!(
                "Cast {} for {:.0} mana (cast {} times).",
                id.def().name,
                cast.cost,
                cast.times_cast
            ))
        }
    }
}

fn print_offline_report(report: &OfflineReport) {
    if report.ticks == 0 {
        return;
    }
    println!(
        "While you were away ({:.0} s): {} squares, {} rows, {} tier changes, +{:.0} blue, +{:.1} mana, +{:.0} combo points",
        report.elapsed_ms as f64 / 1000.0,
        report.squares_filled,
        report.rows_completed,
        report.prestiges,
        report.currency_gained,
        report.mana_gained,
        report.combo_points_gained
    );
}

fn print_status(state: &GameState, now: i64) {
    let layer = &state.layer;
    println!("Tier {}  squares {}/{}  rows {}  multiplier x{:.2}  worth {:.0}",
        state.tier(),
        layer.total_squares,
        layer.capacity(),
        layer.completed_rows,
        layer.total_multiplier(),
        layer.potential_reward()
    );
    println!(
        "Blue {:.0}  pink {:.1}  mana {:.1}  combo points {:.0}",
        state.currency,
        state.pink(),
        state.mana,
        state.combo_points
    );
    if !layer.is_complete() {
        let duration = fill_duration(
            state.tier(),
            layer.current_square_index,
            fill_speed_multiplier(state, now),
            None,
            state.settings.debug_disable_slowdown,
        );
        let remaining = duration * (1.0 - layer.current_square_fill_progress);
        println!("Next square in {:.1} s", remaining / 1000.0);
    }
    if state.prestige.has_won {
        println!("You have won.");
    }
}

/// Foreground loop. Offline time is replayed one slice per tick so a long
/// absence fast-forwards visibly instead of blocking.
fn run(manager: &mut SaveManager, rng: &mut ThreadRng, seconds: Option<u64>) -> io::Result<()> {
    let started = now_millis();
    let (mut state, _) = load_or_default(&*manager, started);
    let mut catch_up = OfflineCatchUp::begin(&mut state, started, rng);
    let mut last_autosave = started;
    let mut last_status = started;

    info!(tier = state.tier(), squares = state.layer.total_squares, "game started");
    print_status(&state, started);

    loop {
        thread::sleep(Duration::from_millis(TICK_INTERVAL_MS));
        let now = now_millis();

        if let Some(mut active) = catch_up.take() {
            if active.step(&mut state, rng) {
                let report = active.finish(&mut state);
                print_offline_report(&report);
            } else {
                catch_up = Some(active);
            }
        } else {
            let result = game_tick(&mut state, now, rng);
            for event in &result.events {
                print_event(event);
            }
        }

        if now - last_autosave >= AUTOSAVE_INTERVAL_MS {
            if let Err(e) = save_game(manager, &state, now) {
                warn!(error = %e, "autosave failed");
            }
            last_autosave = now;
        }
        if now - last_status >= 10_000 {
            print_status(&state, now);
            last_status = now;
        }

        if let Some(limit) = seconds {
            if now - started >= limit as i64 * 1000 {
                break;
            }
        }
    }

    if let Some(active) = catch_up {
        print_offline_report(&active.run_to_completion(&mut state, rng));
    }
    let now = now_millis();
    print_status(&state, now);
    save_game(manager, &state, now).map_err(to_io)
}

fn print_event(event: &TickEvent) {
    match event {
        TickEvent::RowCompleted { row, .. } => println!("Row {} complete!", row + 1),
        TickEvent::RowBonusResolved { row, multiplier } => {
            println!("Row {} bonus: x{}", row + 1, multiplier)
        }
        TickEvent::UpgradesUnlocked { ids } => {
            let names: Vec<&str> = ids.iter().map(|id| id.def().name).collect();
            println!("Unlocked: {}", names.join(", "));
        }
        TickEvent::ComboScored { hand, points } => {
            println!("Combo: {} (+{:.0} points)", hand.name(), points)
        }
        TickEvent::ComboNewHand => {}
        TickEvent::TierAdvanced {
            from_tier,
            to_tier,
            reward,
        } => println!(
            "Grid complete! Tier {} -> {} (worth {:.0})",
            from_tier, to_tier, reward
        ),
        TickEvent::GameWon => println!("You have completed the pink grid. You win!"),
        TickEvent::TransitionFinished => {}
    }
}
