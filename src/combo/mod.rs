//! Combo mini-game: five cards fill one per second and are scored as a hand.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
