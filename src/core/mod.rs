//! Core engine: state, timing math, tick orchestration, tier transitions,
//! and offline catch-up.

pub mod clock;
pub mod collect;
pub mod constants;
pub mod core_game;
pub mod game_loop;
pub mod game_state;
pub mod multipliers;
pub mod offline;
pub mod prestige;
pub mod progression;
pub mod rewards;
pub mod tick;

pub use collect::{collect, Award, CollectOutcome};
pub use core_game::CoreGame;
pub use game_loop::GameLoop;
pub use game_state::{GameState, PrestigeState, Settings, SpellRecord};
pub use offline::{process_offline_progression, OfflineCatchUp, OfflineReport};
pub use prestige::{finish_transition, perform_prestige, PrestigeOutcome};
pub use tick::{game_tick, TickEvent, TickResult};
