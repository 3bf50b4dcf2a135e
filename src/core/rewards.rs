//! Weighted draws for row-bonus multipliers and combo card colours.

use crate::combo::ComboColor;
use rand::Rng;

/// A row-bonus outcome and its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotOption {
    pub multiplier: f64,
    pub probability: f64,
}

/// Row-bonus table, scanned in declared order. Probabilities sum to 1.
pub const SLOT_OPTIONS: [SlotOption; 6] = [
    SlotOption { multiplier: 1.5, probability: 0.30 },
    SlotOption { multiplier: 2.0, probability: 0.25 },
    SlotOption { multiplier: 3.0, probability: 0.20 },
    SlotOption { multiplier: 4.0, probability: 0.15 },
    SlotOption { multiplier: 5.0, probability: 0.07 },
    SlotOption { multiplier: 10.0, probability: 0.03 },
];

/// Maps a roll in [0, 1) onto `SLOT_OPTIONS`.
///
/// Falls back to the last entry when float rounding leaves the cumulative
/// sum short of the roll.
pub fn slot_multiplier_for_roll(roll: f64) -> f64 {
    let mut cumulative = 0.0;
    for option in SLOT_OPTIONS.iter() {
        cumulative += option.probability;
        if roll < cumulative {
            return option.multiplier;
        }
    }
    SLOT_OPTIONS[SLOT_OPTIONS.len() - 1].multiplier
}

/// Draws a row-bonus multiplier.
pub fn draw_slot_multiplier<R: Rng>(rng: &mut R) -> f64 {
    slot_multiplier_for_roll(rng.gen::<f64>())
}

/// Draws a combo card colour uniformly from the palette.
pub fn draw_combo_color<R: Rng>(rng: &mut R) -> ComboColor {
    ComboColor::ALL[rng.gen_range(0..ComboColor::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    #[test]
    fn test_probabilities_sum_to_one() {
        let total: f64 = SLOT_OPTIONS.iter().map(|o| o.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_roll_bands() {
        assert_eq!(slot_multiplier_for_roll(0.0), 1.5);
        assert_eq!(slot_multiplier_for_roll(0.29), 1.5);
        assert_eq!(slot_multiplier_for_roll(0.31), 2.0);
        assert_eq!(slot_multiplier_for_roll(0.60), 3.0);
        assert_eq!(slot_multiplier_for_roll(0.80), 4.0);
        assert_eq!(slot_multiplier_for_roll(0.95), 5.0);
        assert_eq!(slot_multiplier_for_roll(0.99), 10.0);
    }

    #[test]
    fn test_shortfall_falls_back_to_last_entry() {
        assert_eq!(slot_multiplier_for_roll(1.0), 10.0);
        assert_eq!(slot_multiplier_for_roll(0.999_999_999_999), 10.0);
    }

    #[test]
    fn test_draws_converge_to_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draws = 100_000;
        let mut counts: HashMap<u64, u32> = HashMap::new();
        for _ in 0..draws {
            let m = draw_slot_multiplier(&mut rng);
            assert!(SLOT_OPTIONS.iter().any(|o| o.multiplier == m));
            *counts.entry(m.to_bits()).or_default() += 1;
        }
        for option in SLOT_OPTIONS.iter() {
            let seen = *counts.get(&option.multiplier.to_bits()).unwrap_or(&0) as f64 / draws as f64;
            assert!(
                (seen - option.probability).abs() < 0.01,
                "{}x seen {:.4}, expected {:.2}",
                option.multiplier,
                seen,
                option.probability
            );
        }
    }

    #[test]
    fn test_combo_colors_cover_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(draw_combo_color(&mut rng));
        }
        assert_eq!(seen.len(), ComboColor::ALL.len());
    }
}
