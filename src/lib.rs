//! Squares - idle grid-fill game engine.
//!
//! The library holds the whole simulation: grid filling, row bonuses, the
//! combo mini-game, the shop, tier transitions, offline catch-up, and the
//! save format. The binaries are thin drivers on top of it.

pub mod build_info;
pub mod combo;
pub mod core;
pub mod grid;
pub mod persistence;
pub mod shop;
pub mod simulator;
