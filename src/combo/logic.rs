//! Combo hand dealing, classification, and payout.

use super::types::{ComboColor, ComboHand, ComboState, ResultDisplay};
use crate::core::constants::{COMBO_FILL_TIME_MS, COMBO_RESULT_DISPLAY_MS, COMBO_SQUARE_COUNT};
use crate::core::rewards::draw_combo_color;
use rand::Rng;
use std::collections::HashMap;

/// Upgrade-derived payout modifiers, captured once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoutModifiers {
    pub points_multiplier: f64,
    pub lucky_blue: bool,
    pub crazy_pink: bool,
}

impl Default for PayoutModifiers {
    fn default() -> Self {
        Self {
            points_multiplier: 1.0,
            lucky_blue: false,
            crazy_pink: false,
        }
    }
}

/// A hand that finished during an advance.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboScored {
    pub hand: ComboHand,
    pub points: f64,
}

/// What `advance_combo` did.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboAdvance {
    Idle,
    Filling,
    Scored(ComboScored),
    NewHand,
}

/// Classifies the colours currently showing.
pub fn classify_hand(colors: &[ComboColor]) -> ComboHand {
    let mut counts: HashMap<ComboColor, u32> = HashMap::new();
    for color in colors {
        *counts.entry(*color).or_default() += 1;
    }
    let mut counts: Vec<u32> = counts.into_values().collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));

    let first = counts.first().copied().unwrap_or(0);
    let second = counts.get(1).copied().unwrap_or(0);
    match (first, second) {
        (5, _) => ComboHand::FiveOfAKind,
        (4, _) => ComboHand::FourOfAKind,
        (3, 2) => ComboHand::FullHouse,
        (3, _) => ComboHand::ThreeOfAKind,
        (2, 2) => ComboHand::TwoPair,
        (2, _) => ComboHand::OnePair,
        _ => ComboHand::Nothing,
    }
}

/// Points paid for `hand` given the visible `colors`. Always an integer.
pub fn evaluate_payout(hand: ComboHand, colors: &[ComboColor], modifiers: PayoutModifiers) -> f64 {
    let mut points = hand.base_points() * modifiers.points_multiplier;

    if modifiers.lucky_blue {
        let blue = colors.iter().filter(|c| **c == ComboColor::Blue).count();
        points *= 2f64.powi(blue as i32);
    }
    if modifiers.crazy_pink {
        let pink = colors.iter().filter(|c| **c == ComboColor::Pink).count();
        if pink >= 3 {
            points *= 100.0;
        }
    }

    points.floor()
}

/// Advances the mini-grid by `delta_ms`.
///
/// While a result is on display nothing fills; once it expires the grid is
/// cleared and the rest of that tick is spent.
pub fn advance_combo<R: Rng>(
    combo: &mut ComboState,
    delta_ms: f64,
    now: i64,
    modifiers: PayoutModifiers,
    rng: &mut R,
) -> ComboAdvance {
    if let Some(result) = &combo.result {
        if now >= result.expires_at {
            combo.deal_fresh_hand();
            return ComboAdvance::NewHand;
        }
        return ComboAdvance::Idle;
    }

    let mut remaining = delta_ms.max(0.0);
    while remaining > 0.0 && combo.current_index < COMBO_SQUARE_COUNT {
        let square = &mut combo.squares[combo.current_index];
        if square.color.is_none() {
            square.color = Some(draw_combo_color(rng));
        }

        let needed = (1.0 - combo.current_fill_progress) * COMBO_FILL_TIME_MS;
        if remaining < needed {
            combo.current_fill_progress += remaining / COMBO_FILL_TIME_MS;
            square.fill_progress = combo.current_fill_progress;
            remaining = 0.0;
        } else {
            square.filled = true;
            square.fill_progress = 1.0;
            remaining -= needed;
            combo.current_index += 1;
            combo.current_fill_progress = 0.0;
        }
    }

    if combo.current_index < COMBO_SQUARE_COUNT {
        return ComboAdvance::Filling;
    }

    let colors: Vec<ComboColor> = combo.filled_colors().collect();
    let hand = classify_hand(&colors);
    let points = evaluate_payout(hand, &colors, modifiers);
    combo.result = Some(ResultDisplay {
        hand,
        points,
        expires_at: now + COMBO_RESULT_DISPLAY_MS,
    });
    ComboAdvance::Scored(ComboScored { hand, points })
}
