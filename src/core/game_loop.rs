//! Shared game loop trait for the interactive driver and the simulator.

use super::collect::CollectOutcome;
use super::game_state::GameState;
use super::tick::TickResult;
use rand::Rng;

/// Core game loop trait.
///
/// Lets the terminal driver run on the wall clock while the simulator runs
/// thousands of ticks on a simulated one, through the same calls.
pub trait GameLoop {
    /// Execute one game tick. Returns what happened.
    fn tick(&mut self, rng: &mut impl Rng) -> TickResult;

    /// Cash in the live grid.
    fn collect(&mut self, rng: &mut impl Rng) -> CollectOutcome;

    /// Current time as this loop sees it (Unix ms).
    fn now(&self) -> i64;

    /// Get current game state (read-only).
    fn state(&self) -> &GameState;

    /// Get current game state (mutable).
    fn state_mut(&mut self) -> &mut GameState;
}
