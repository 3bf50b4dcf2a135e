//! Grid fill state machine and row-bonus resolution.

use super::types::{GridLayer, RowBonus};
use crate::core::constants::SPIN_DURATION_MS;
use crate::core::progression::{fill_duration, previous_tier_last_square_duration};
use crate::core::rewards::draw_slot_multiplier;
use rand::Rng;

/// A row that became complete during a fill pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCompletion {
    pub row: usize,
    /// `Some` when the bonus was rolled immediately (fast-forward).
    pub multiplier: Option<f64>,
}

/// What a single fill pass did to the layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillOutcome {
    pub squares_filled: u32,
    pub rows_completed: Vec<RowCompletion>,
    /// True when the cursor reached capacity on a completed square.
    pub reached_capacity: bool,
}

/// Parameters that stay fixed for one fill pass.
#[derive(Debug, Clone, Copy)]
pub struct FillParams {
    pub tier: u32,
    pub fill_speed_multiplier: f64,
    pub slowdown_disabled: bool,
    /// Roll row bonuses immediately instead of scheduling a spin.
    pub resolve_immediately: bool,
    pub now: i64,
}

/// Consumes `delta_ms` square by square from the cursor.
pub fn advance_fill<R: Rng>(
    layer: &mut GridLayer,
    delta_ms: f64,
    params: FillParams,
    rng: &mut R,
) -> FillOutcome {
    let mut outcome = FillOutcome::default();
    let capacity = layer.capacity();
    let previous_last = previous_tier_last_square_duration(params.tier, params.slowdown_disabled);
    let mut remaining = delta_ms.max(0.0);

    while remaining > 0.0 && layer.current_square_index < capacity {
        let index = layer.current_square_index;
        let duration = fill_duration(
            params.tier,
            index,
            params.fill_speed_multiplier,
            previous_last,
            params.slowdown_disabled,
        );
        let needed = (1.0 - layer.current_square_fill_progress) * duration;

        if remaining < needed {
            layer.current_square_fill_progress += remaining / duration;
            layer.squares[index].fill_progress = layer.current_square_fill_progress;
            break;
        }

        remaining -= needed;
        let square = &mut layer.squares[index];
        square.filled = true;
        square.fill_progress = 1.0;
        layer.total_squares += 1;
        layer.current_square_index += 1;
        layer.current_square_fill_progress = 0.0;
        outcome.squares_filled += 1;

        if let Some(completion) = complete_row_if_full(layer, index, &params, rng) {
            outcome.rows_completed.push(completion);
        }

        if layer.current_square_index == capacity {
            outcome.reached_capacity = true;
            break;
        }
    }

    outcome
}

/// Marks the row containing `square_index` complete once every square in it
/// is filled, and attaches its bonus.
fn complete_row_if_full<R: Rng>(
    layer: &mut GridLayer,
    square_index: usize,
    params: &FillParams,
    rng: &mut R,
) -> Option<RowCompletion> {
    let row = layer.squares[square_index].row;
    if layer.squares[square_index].row_completed {
        return None;
    }
    if !layer.squares.iter().filter(|s| s.row == row).all(|s| s.filled) {
        return None;
    }

    for square in layer.squares.iter_mut().filter(|s| s.row == row) {
        square.row_completed = true;
    }
    layer.completed_rows += 1;

    let bonus = if params.resolve_immediately {
        RowBonus::resolved(row, draw_slot_multiplier(rng))
    } else {
        RowBonus::spinning(row, params.now + SPIN_DURATION_MS)
    };
    let completion = RowCompletion {
        row,
        multiplier: bonus.multiplier,
    };
    layer.row_bonuses.push(bonus);
    Some(completion)
}

/// Rolls every pending bonus whose spin has finished by `now`.
///
/// Returns `(row, multiplier)` for each bonus resolved.
pub fn resolve_due<R: Rng>(layer: &mut GridLayer, now: i64, rng: &mut R) -> Vec<(usize, f64)> {
    let mut resolved = Vec::new();
    for bonus in layer.row_bonuses.iter_mut() {
        if bonus.is_pending() && bonus.resolve_at.map_or(true, |at| at <= now) {
            let multiplier = draw_slot_multiplier(rng);
            finalize(bonus, multiplier);
            resolved.push((bonus.row, multiplier));
        }
    }
    resolved
}

/// Rolls every pending bonus regardless of its spin deadline.
pub fn force_resolve<R: Rng>(layer: &mut GridLayer, rng: &mut R) -> Vec<(usize, f64)> {
    let mut resolved = Vec::new();
    for bonus in layer.row_bonuses.iter_mut().filter(|b| b.is_pending()) {
        let multiplier = draw_slot_multiplier(rng);
        finalize(bonus, multiplier);
        resolved.push((bonus.row, multiplier));
    }
    resolved
}

/// Resolves the pending bonus for `row`, if there is one.
///
/// A row that was never completed on this layer, or whose bonus is already
/// final, is left untouched and `false` is returned. This is how a late
/// resolution aimed at a layer that has since been reset is ignored.
pub fn resolve_row_bonus<R: Rng>(layer: &mut GridLayer, row: usize, rng: &mut R) -> bool {
    match layer
        .row_bonuses
        .iter_mut()
        .find(|b| b.row == row && b.is_pending())
    {
        Some(bonus) => {
            finalize(bonus, draw_slot_multiplier(rng));
            true
        }
        None => false,
    }
}

fn finalize(bonus: &mut RowBonus, multiplier: f64) {
    bonus.multiplier = Some(multiplier);
    bonus.is_spinning = false;
    bonus.resolve_at = None;
}
