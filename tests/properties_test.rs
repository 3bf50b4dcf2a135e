//! Property checks over fill timing, the fill state machine, and reward rolls.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squares::core::constants::TOTAL_SQUARES;
use squares::core::progression::fill_duration;
use squares::core::rewards::{draw_slot_multiplier, SLOT_OPTIONS};
use squares::grid::{advance_fill, FillParams, GridLayer};

proptest! {
    #[test]
    fn prop_total_squares_monotone_and_bounded(
        deltas in prop::collection::vec(0.0f64..20_000.0, 1..60),
        speed in 0.5f64..50.0,
        seed in 0u64..1_000,
    ) {
        let mut layer = GridLayer::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut now = 0i64;
        let mut previous = 0u32;

        for delta in deltas {
            now += delta as i64;
            let params = FillParams {
                tier: 0,
                fill_speed_multiplier: speed,
                slowdown_disabled: false,
                resolve_immediately: false,
                now,
            };
            advance_fill(&mut layer, delta, params, &mut rng);
            prop_assert!(layer.total_squares >= previous);
            prop_assert!(layer.total_squares as usize <= layer.capacity());
            prop_assert!(layer.current_square_fill_progress >= 0.0);
            prop_assert!(layer.current_square_fill_progress <= 1.0);
            previous = layer.total_squares;
        }
    }

    #[test]
    fn prop_fill_duration_grows_with_index(
        tier in 0u32..3,
        index in 0usize..(TOTAL_SQUARES - 1),
        speed in 0.1f64..1_000.0,
    ) {
        let here = fill_duration(tier, index, speed, None, false);
        let next = fill_duration(tier, index + 1, speed, None, false);
        prop_assert!(here > 0.0);
        prop_assert!(next > here);
    }

    #[test]
    fn prop_slot_draws_come_from_table(seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..32 {
            let m = draw_slot_multiplier(&mut rng);
            prop_assert!(SLOT_OPTIONS.iter().any(|o| o.multiplier == m));
        }
    }
}
