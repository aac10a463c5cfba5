#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the vesting math.
//!
//! Invariants tested:
//! - `released` is 0 at age 0 and equals `accrued` from `max_release_period` on
//! - `released` never decreases as age grows and never exceeds `accrued`
//! - Blending keeps `w1 × a1 / (w1 + w2)` of the old age, rounded down
//! - A blended stake is never older than the stake it grew from

use proptest::prelude::*;
use staking_pool::vesting::{blended_age_timestamp, capped_age, released};

proptest! {
    /// Release boundaries: nothing at age 0, everything once fully aged.
    #[test]
    fn prop_release_boundaries(
        accrued in 0i128..=1_000_000_000_000i128,
        period in 1u64..=10_000_000u64,
        extra in 0u64..=1_000_000u64,
    ) {
        prop_assert_eq!(released(accrued, 0, period).unwrap(), 0);
        prop_assert_eq!(released(accrued, period, period).unwrap(), accrued);
        prop_assert_eq!(released(accrued, period + extra, period).unwrap(), accrued);
    }

    /// Release is monotone in age and bounded by the accrued amount.
    #[test]
    fn prop_release_monotone(
        accrued in 0i128..=1_000_000_000_000i128,
        period in 1u64..=1_000_000u64,
        a in 0u64..=2_000_000u64,
        b in 0u64..=2_000_000u64,
    ) {
        let (young, old) = if a <= b { (a, b) } else { (b, a) };
        let r_young = released(accrued, young, period).unwrap();
        let r_old = released(accrued, old, period).unwrap();

        prop_assert!(r_young <= r_old);
        prop_assert!(r_old <= accrued);
        prop_assert!(r_young >= 0);
    }

    /// The blended age is the weighted average of the old age and zero.
    #[test]
    fn prop_blended_age_is_weighted_average(
        now in 0u64..=1_000_000_000u64,
        age_timestamp in 0u64..=1_000_000_000u64,
        period in 1u64..=10_000_000u64,
        old_weight in 1i128..=1_000_000_000i128,
        added in 1i128..=1_000_000_000i128,
    ) {
        let age = capped_age(now, age_timestamp, period);
        let new_weight = old_weight + added;
        let blended = blended_age_timestamp(now, old_weight, age, new_weight).unwrap();

        let new_age = i128::from(now - blended);
        let exact = old_weight * i128::from(age);
        // new_age = floor(w1 × a1 / (w1 + w2))
        prop_assert!(new_age * new_weight <= exact);
        prop_assert!(exact < (new_age + 1) * new_weight);
        prop_assert!(now - blended <= age);
    }
}
