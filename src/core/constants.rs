// Grid geometry
pub const GRID_SIZE: usize = 12;
pub const TOTAL_SQUARES: usize = GRID_SIZE * GRID_SIZE;

// Tick and timing (milliseconds)
pub const TICK_INTERVAL_MS: u64 = 100;
pub const FILL_TIME_MS: f64 = 1000.0;
pub const SPIN_DURATION_MS: i64 = 300;
pub const TRANSITION_DURATION_MS: i64 = 1600;
pub const AUTOSAVE_INTERVAL_MS: i64 = 3000;

// Progression curve
pub const SLOWDOWN_FACTOR: f64 = 1.1;
pub const LAYER_TIME_MULTIPLIER: f64 = 200.0;

// Highest tier that pays out on collect. Leaving it sets `has_won`.
pub const TOP_PLAYABLE_TIER: u32 = 1;

// Offline catch-up
pub const OFFLINE_MIN_ELAPSED_MS: i64 = 5000;
pub const OFFLINE_SPEED_MULTIPLIER: u32 = 60;

// Combo mini-grid
pub const COMBO_SQUARE_COUNT: usize = 5;
pub const COMBO_FILL_TIME_MS: f64 = 1000.0;
pub const COMBO_RESULT_DISPLAY_MS: i64 = 2000;

// Skill table revision. Saves written against an older table get refunded.
pub const SKILL_TABLE_VERSION: u32 = 2;

// Save file envelope
pub const SAVE_VERSION_MAGIC: u64 = 0x5351_5541_5245_5302;
