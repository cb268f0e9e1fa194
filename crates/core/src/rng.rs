//! Linear congruential random source shared by every stage of one floor attempt.
//!
//! Every call advances the shared state, so call order and call count are part
//! of the output: skipping a draw whose value is unused shifts every tile that
//! follows.

use serde::{Deserialize, Serialize};

const MULTIPLIER: u32 = 0x5D58_8B65;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RngState {
    pub hi: u32,
    pub lo: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DungeonRng {
    state: RngState,
}

impl DungeonRng {
    pub fn new(seed: u32) -> Self {
        Self { state: RngState { hi: seed >> 16, lo: seed & 0xFFFF } }
    }

    pub fn state(&self) -> RngState {
        self.state
    }

    /// Number of draws taken since the generator was seeded with `seed`.
    pub fn draws_since(&self, seed: u32) -> u32 {
        self.state.hi.wrapping_sub(seed >> 16)
    }

    pub fn draw16(&mut self) -> u32 {
        self.state.hi = self.state.hi.wrapping_add(1);
        self.state.lo = self.state.lo.wrapping_mul(MULTIPLIER).wrapping_add(1);
        self.state.lo >> 16
    }

    /// Value in `[0, n)` for `0 < n <= 65536`.
    ///
    /// Negative `n` wraps to a large unsigned bound and the product is truncated
    /// to 32 bits before scaling, matching the game's arithmetic.
    pub fn rand_int(&mut self, n: i32) -> i32 {
        let scaled = self.draw16().wrapping_mul(n as u32) >> 16;
        i32::from(scaled as u16)
    }

    /// Value in `[min(a, b), max(a, b))`, or `a` when both bounds are equal.
    ///
    /// Results pass through 16 bits, so a negative result wraps to a large
    /// positive one. Callers whose bounds may go below zero add an offset to
    /// [`Self::rand_int`] instead.
    pub fn rand_range(&mut self, a: i32, b: i32) -> i32 {
        if a == b {
            return i32::from(a as u16);
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let span = high.wrapping_sub(low) as u32;
        let offset = self.draw16().wrapping_mul(span) >> 16;
        i32::from((low as u32).wrapping_add(offset) as u16)
    }

    /// One `rand_int(100)` draw; succeeds when the draw is **not** below `percentage`.
    pub fn chance(&mut self, percentage: i32) -> bool {
        self.rand_int(100) >= percentage
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn seed_splits_into_counter_and_lcg_halves() {
        let rng = DungeonRng::new(0x1234_ABCD);
        assert_eq!(rng.state(), RngState { hi: 0x1234, lo: 0xABCD });
    }

    #[test]
    fn draw16_returns_high_half_of_advanced_state() {
        let mut rng = DungeonRng::new(0);
        // lo = 0 * C + 1 = 1, high half is 0.
        assert_eq!(rng.draw16(), 0);
        // lo = 1 * C + 1 = 0x5D588B66.
        assert_eq!(rng.draw16(), 0x5D58);
        assert_eq!(rng.state().lo, 0x5D58_8B66);
        assert_eq!(rng.draws_since(0), 2);
    }

    #[test]
    fn rand_range_with_equal_bounds_consumes_no_draw() {
        let mut rng = DungeonRng::new(77);
        let before = rng.state();
        assert_eq!(rng.rand_range(9, 9), 9);
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn rand_range_wraps_negative_results_into_sixteen_bits() {
        let mut rng = DungeonRng::new(3);
        // A span of one always yields the lower bound.
        assert_eq!(rng.rand_range(-1, 0), 0xFFFF);
        assert_eq!(rng.draws_since(3), 1);
    }

    #[test]
    fn chance_is_inverted_relative_to_threshold() {
        let mut always = DungeonRng::new(5);
        for _ in 0..200 {
            assert!(always.chance(0), "every draw is at least zero");
        }
        let mut never = DungeonRng::new(5);
        for _ in 0..200 {
            assert!(!never.chance(100), "no draw reaches one hundred");
        }
    }

    #[test]
    fn identical_seeds_replay_identical_sequences() {
        let mut left = DungeonRng::new(987_654);
        let mut right = DungeonRng::new(987_654);
        let a: Vec<i32> = (0..64).map(|_| left.rand_int(1000)).collect();
        let b: Vec<i32> = (0..64).map(|_| right.rand_int(1000)).collect();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn rand_int_stays_below_bound(seed in any::<u32>(), n in 1_i32..=65_536) {
            let mut rng = DungeonRng::new(seed);
            for _ in 0..16 {
                let value = rng.rand_int(n);
                prop_assert!((0..n).contains(&value));
            }
        }

        #[test]
        fn rand_range_stays_inside_closed_interval(
            seed in any::<u32>(),
            a in 0_i32..=32_767,
            b in 0_i32..=32_767
        ) {
            let mut rng = DungeonRng::new(seed);
            let value = rng.rand_range(a, b);
            prop_assert!(value >= a.min(b) && value <= a.max(b));
        }

        #[test]
        fn rand_range_over_negative_bounds_is_the_sixteen_bit_image(
            seed in any::<u32>(),
            a in -16_384_i32..16_384,
            b in -16_384_i32..16_384
        ) {
            prop_assume!(a != b);
            let mut rng = DungeonRng::new(seed);
            let signed = i32::from(rng.rand_range(a, b) as u16 as i16);
            prop_assert!((a.min(b)..a.max(b)).contains(&signed));
        }

        #[test]
        fn offset_from_rand_int_matches_rand_range_draw_for_draw(seed in any::<u32>(), centre in -100_i32..100) {
            let mut ranged = DungeonRng::new(seed);
            let mut offset = DungeonRng::new(seed);
            let wrapped = ranged.rand_range(centre - 2, centre + 2);
            let signed = centre - 2 + offset.rand_int(4);
            prop_assert_eq!(i32::from(wrapped as u16 as i16), signed);
            prop_assert_eq!(ranged.state(), offset.state());
        }
    }
}
