//! Simulation configuration.

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Maximum 100 ms ticks per run before timeout
    pub max_ticks_per_run: u64,

    /// Stop a run once this tier is reached
    pub target_tier: u32,

    /// Collect once the next square would take longer than this
    pub collect_patience_ms: f64,

    /// Buy upgrades and skills greedily, cheapest first
    pub auto_buy: bool,

    /// Cast spells whenever mana allows
    pub auto_cast: bool,

    /// Forwarded to the debug speed setting
    pub speed_multiplier: f64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 20,
            seed: None,
            max_ticks_per_run: 500_000,
            target_tier: 1,
            collect_patience_ms: 60_000.0,
            auto_buy: true,
            auto_cast: true,
            speed_multiplier: 1.0,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// A handful of short runs for a fast sanity check.
    pub fn quick() -> Self {
        Self {
            num_runs: 5,
            max_ticks_per_run: 50_000,
            ..Default::default()
        }
    }

    /// Idle play: never buys, never casts, only collects.
    pub fn idle_only() -> Self {
        Self {
            auto_buy: false,
            auto_cast: false,
            ..Default::default()
        }
    }

    /// Long runs aimed at finishing the pink tier.
    pub fn full_progression() -> Self {
        Self {
            num_runs: 10,
            max_ticks_per_run: 5_000_000,
            target_tier: 2,
            ..Default::default()
        }
    }
}
