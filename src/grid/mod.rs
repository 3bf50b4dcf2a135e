//! The main fill grid: squares, row bonuses, and the fill state machine.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
