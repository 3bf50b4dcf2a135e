//! Game balance simulator CLI.
//!
//! Run seeded auto-play sessions to see how long each tier takes.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 20 runs to tier 1
//!   cargo run --bin simulate -- -n 5 --tier 2   # 5 runs to tier 2
//!   cargo run --bin simulate -- --seed 42       # Reproducible run

use squares::simulator::{run_simulation, SimConfig};
use std::env;
use std::io;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              SQUARES BALANCE SIMULATOR                        ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Target Tier:    {}", config.target_tier);
    println!("  Max Ticks:      {}", config.max_ticks_per_run);
    println!("  Patience:       {:.0} ms", config.collect_patience_ms);
    println!("  Auto Buy:       {}", config.auto_buy);
    println!("  Auto Cast:      {}", config.auto_cast);
    if config.speed_multiplier != 1.0 {
        println!("  Speed:          {}x", config.speed_multiplier);
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, report.to_json())?;
        println!("JSON report saved to: {}", filename);
    }
    Ok(())
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "--tier" => {
                if i + 1 < args.len() {
                    config.target_tier = args[i + 1].parse().unwrap_or(1);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--ticks" => {
                if i + 1 < args.len() {
                    config.max_ticks_per_run = args[i + 1].parse().unwrap_or(500_000);
                    i += 1;
                }
            }
            "-p" | "--patience" => {
                if i + 1 < args.len() {
                    config.collect_patience_ms = args[i + 1].parse().unwrap_or(60_000.0);
                    i += 1;
                }
            }
            "--speed" => {
                if i + 1 < args.len() {
                    config.speed_multiplier = args[i + 1].parse().unwrap_or(1.0);
                    i += 1;
                }
            }
            "--no-buy" => config.auto_buy = false,
            "--no-cast" => config.auto_cast = false,
            "-v" | "--verbose" => config.verbosity = 2,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => config = SimConfig::quick(),
            "--idle" => config = SimConfig::idle_only(),
            "--full" => config = SimConfig::full_progression(),
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Squares Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>      Number of simulation runs (default: 20)");
    println!("    --tier <T>          Stop once this tier is reached (default: 1)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -t, --ticks <T>     Max 100 ms ticks per run (default: 500,000)");
    println!("    -p, --patience <MS> Collect when the next square takes longer (default: 60000)");
    println!("    --speed <X>         Debug fill speed multiplier");
    println!("    --no-buy            Never buy upgrades or skills");
    println!("    --no-cast           Never cast spells");
    println!("    -v, --verbose       Per-run output");
    println!("    --json              Save JSON report");
    println!("    --quick             Quick test (5 short runs)");
    println!("    --idle              Collect only, no shopping");
    println!("    --full              Long runs aimed at tier 2");
    println!("    -h, --help          Show this help");
}
