//! Property-Based Test Generators
//!
//! Proptest strategies for amounts, weights and participant lists that
//! respect the engine's input domain.

use core_kernel::{Money, MAX_SAFE_MINOR};
use domain_quota::{Participant, MAX_INSTALLMENTS};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for non-negative totals up to ten billion minor units
pub fn total_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000_000i64).prop_map(|minor| Money::from_minor(minor).unwrap_or(Money::ZERO))
}

/// Strategy for totals anywhere in the safe range
pub fn large_total_strategy() -> impl Strategy<Value = Money> {
    (0i64..=MAX_SAFE_MINOR).prop_map(|minor| Money::from_minor(minor).unwrap_or(Money::ZERO))
}

/// Strategy for valid installment counts
pub fn installment_count_strategy() -> impl Strategy<Value = u32> {
    1u32..=MAX_INSTALLMENTS
}

/// Strategy for weights with up to three decimal places, zero included
fn weight_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64, 0u32..=3u32).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Strategy for positive integer permillages
fn permillage_strategy() -> impl Strategy<Value = Decimal> {
    (1u32..=1000u32).prop_map(Decimal::from)
}

/// Strategy for participant lists with at least one positive weight
///
/// Participants are identified by their position.
pub fn participants_strategy(max_len: usize) -> impl Strategy<Value = Vec<Participant<usize>>> {
    (proptest::collection::vec(weight_strategy(), 1..=max_len), permillage_strategy()).prop_map(
        |(mut weights, anchor)| {
            if weights.iter().all(|w| w.is_zero()) {
                weights[0] = anchor;
            }
            weights
                .into_iter()
                .enumerate()
                .map(|(i, w)| Participant::new(i, w))
                .collect()
        },
    )
}

/// Strategy for `count` equal-weight participants
pub fn equal_participants_strategy(max_len: usize) -> impl Strategy<Value = Vec<Participant<usize>>> {
    (1..=max_len).prop_map(|count| (0..count).map(Participant::equal).collect())
}
