//! Save snapshots, the on-disk envelope, and JSON export/import.

pub mod error;
pub mod save_data;
pub mod save_manager;

pub use error::SaveError;
pub use save_data::{export_json, import_json, LoadReport, SaveData};
pub use save_manager::{load_or_default, save_game, MemoryStore, SaveManager, SaveStore};
