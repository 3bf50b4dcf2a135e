//! Shop: upgrade, skill, and spell tables and the transactions against them.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
