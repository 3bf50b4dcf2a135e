//! Balance simulator.
//!
//! Runs many seeded playthroughs under a greedy auto-player to see how long
//! each tier takes and where the economy stalls. It drives `CoreGame`, so the
//! numbers come from the same code the interactive driver runs.

mod config;
mod report;
mod runner;
mod stats;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::run_simulation;
pub use stats::RunStats;
