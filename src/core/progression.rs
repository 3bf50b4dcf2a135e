//! Per-square fill duration for every tier.
//!
//! Tier 0 squares take `FILL_TIME_MS × 1.1^index`. Each higher tier starts at
//! the previous tier's last-square duration times `LAYER_TIME_MULTIPLIER` and
//! compounds the same way, so one completed lower grid is worth exactly one
//! square of the next.

use crate::core::constants::{FILL_TIME_MS, LAYER_TIME_MULTIPLIER, SLOWDOWN_FACTOR, TOTAL_SQUARES};

/// Compounding slowdown applied to square `index`.
pub fn slowdown_factor(square_index: usize, slowdown_disabled: bool) -> f64 {
    if slowdown_disabled {
        1.0
    } else {
        SLOWDOWN_FACTOR.powi(square_index as i32)
    }
}

/// Duration in milliseconds of the last square of `tier - 1`, measured with a
/// fill-speed multiplier of 1. Returns `None` for tier 0.
pub fn previous_tier_last_square_duration(tier: u32, slowdown_disabled: bool) -> Option<f64> {
    if tier == 0 {
        return None;
    }
    let last = slowdown_factor(TOTAL_SQUARES - 1, slowdown_disabled);
    let mut duration = FILL_TIME_MS * last;
    for _ in 1..tier {
        duration = duration * LAYER_TIME_MULTIPLIER * last;
    }
    Some(duration)
}

/// Time in milliseconds to fill square `square_index` at `tier`.
///
/// `previous_tier_last` may be supplied by callers that already computed it
/// for the current tick; when `None` it is derived from `tier`.
pub fn fill_duration(
    tier: u32,
    square_index: usize,
    fill_speed_multiplier: f64,
    previous_tier_last: Option<f64>,
    slowdown_disabled: bool,
) -> f64 {
    let base = if tier == 0 {
        FILL_TIME_MS
    } else {
        let previous = previous_tier_last
            .or_else(|| previous_tier_last_square_duration(tier, slowdown_disabled))
            .unwrap_or(FILL_TIME_MS);
        previous * LAYER_TIME_MULTIPLIER
    };

    let multiplier = if fill_speed_multiplier.is_finite() && fill_speed_multiplier > 0.0 {
        fill_speed_multiplier
    } else {
        1.0
    };

    base * slowdown_factor(square_index, slowdown_disabled) / multiplier
}
