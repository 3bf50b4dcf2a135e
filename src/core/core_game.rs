//! Self-contained engine on a simulated clock.
//!
//! `CoreGame` owns its `GameState` and advances time by exactly
//! `TICK_INTERVAL_MS` per tick. The simulator and the integration tests use
//! it to run long sessions deterministically.

use super::collect::{collect, CollectOutcome};
use super::constants::TICK_INTERVAL_MS;
use super::game_loop::GameLoop;
use super::game_state::GameState;
use super::tick::{game_tick, TickResult};
use crate::shop::{
    cast_spell, purchase_skill, purchase_upgrade, ActionError, SkillId, SpellCast, SpellId,
    UpgradeId,
};
use rand::Rng;

pub struct CoreGame {
    state: GameState,
    clock: i64,
}

impl CoreGame {
    /// Fresh game with the simulated clock at `start`.
    pub fn new(start: i64) -> Self {
        Self {
            state: GameState::new(start),
            clock: start,
        }
    }

    /// Wraps an existing state; the clock resumes from its last tick.
    pub fn from_state(state: GameState) -> Self {
        let clock = state.last_update;
        Self { state, clock }
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Moves the clock forward without ticking.
    pub fn advance_clock(&mut self, ms: i64) {
        self.clock += ms.max(0);
    }

    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Result<u32, ActionError> {
        purchase_upgrade(&mut self.state, id)
    }

    pub fn purchase_skill(&mut self, id: SkillId) -> Result<(), ActionError> {
        purchase_skill(&mut self.state, id)
    }

    pub fn cast_spell(&mut self, id: SpellId) -> Result<SpellCast, ActionError> {
        cast_spell(&mut self.state, id, self.clock)
    }
}

impl GameLoop for CoreGame {
    fn tick(&mut self, rng: &mut impl Rng) -> TickResult {
        self.clock += TICK_INTERVAL_MS as i64;
        game_tick(&mut self.state, self.clock, rng)
    }

    fn collect(&mut self, rng: &mut impl Rng) -> CollectOutcome {
        collect(&mut self.state, rng)
    }

    fn now(&self) -> i64 {
        self.clock
    }

    fn state(&self) -> &GameState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_first_square_fills_after_about_a_second() {
        let mut game = CoreGame::new(0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..11 {
            game.tick(&mut rng);
        }
        assert_eq!(game.now(), 1100);
        assert_eq!(game.state().layer.total_squares, 1);
    }

    #[test]
    fn test_from_state_resumes_clock() {
        let game = CoreGame::from_state(GameState::new(5_000));
        assert_eq!(game.now(), 5_000);
    }

    #[test]
    fn test_cast_uses_simulated_clock() {
        let mut game = CoreGame::new(1_000);
        game.state_mut().mana = 100.0;
        let cast = game.cast_spell(SpellId::Haste).unwrap();
        assert_eq!(cast.active_until, Some(31_000));
    }
}
