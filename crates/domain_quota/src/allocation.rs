//! Largest-remainder allocation
//!
//! Apportions a total across weighted participants (Hamilton method):
//!
//! 1. Each exact share `total * w / W` is split into its floor and remainder
//! 2. The floors are handed out
//! 3. The cents still missing go, one each, to the largest remainders,
//!    ties broken by the earlier position in the participant list
//!
//! The result always sums to the total, and a participant with zero weight
//! never receives anything.

use core_kernel::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuotaError, QuotaResult};
use crate::weights::{apply_mode, Participant, WeightMode, WeightUnits};

/// A participant's part of an apportioned total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation<Id> {
    pub participant_id: Id,
    pub amount: Money,
}

/// Apportions `total` across participants by their raw weights
///
/// Output order matches input order.
///
/// # Errors
///
/// * `InvalidTotal` - `total` is negative
/// * `InvalidWeight` - a weight is negative
/// * `NoValidWeights` - no participant has a positive weight
/// * `ArithmeticOverflow` - weights too large to scale exactly
pub fn allocate<Id: Clone>(total: Money, participants: &[Participant<Id>]) -> QuotaResult<Vec<Allocation<Id>>> {
    if total.is_negative() {
        return Err(QuotaError::negative_total(total));
    }

    let weights = WeightUnits::from_participants(participants)?;
    let amounts = largest_remainder(i128::from(total.minor()), &weights)?;

    let allocations = participants
        .iter()
        .zip(amounts)
        .map(|(participant, minor)| {
            let minor = i64::try_from(minor).map_err(|_| QuotaError::ArithmeticOverflow)?;
            Ok(Allocation {
                participant_id: participant.id.clone(),
                amount: Money::from_minor(minor)?,
            })
        })
        .collect::<QuotaResult<Vec<_>>>()?;

    debug!(
        total = total.minor(),
        participants = allocations.len(),
        "Allocated total across participants"
    );

    Ok(allocations)
}

/// Apportions `total` after interpreting weights with `mode`
pub fn allocate_with_mode<Id: Clone>(
    total: Money,
    participants: &[Participant<Id>],
    mode: WeightMode,
) -> QuotaResult<Vec<Allocation<Id>>> {
    allocate(total, &apply_mode(participants, mode))
}

/// Distributes `total` integer units proportionally to `weights`
pub(crate) fn largest_remainder(total: i128, weights: &WeightUnits) -> QuotaResult<Vec<i128>> {
    let mut floors = Vec::with_capacity(weights.units.len());
    let mut remainders = Vec::with_capacity(weights.units.len());

    for &unit in &weights.units {
        let exact = total.checked_mul(unit).ok_or(QuotaError::ArithmeticOverflow)?;
        floors.push(exact / weights.total);
        remainders.push(exact % weights.total);
    }

    let distributed: i128 = floors.iter().sum();
    let deficit = usize::try_from(total - distributed).map_err(|_| QuotaError::ArithmeticOverflow)?;

    let mut order: Vec<usize> = (0..floors.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));

    for &position in order.iter().take(deficit) {
        floors[position] += 1;
    }

    Ok(floors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn participants(weights: &[Decimal]) -> Vec<Participant<usize>> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| Participant::new(i, *w))
            .collect()
    }

    fn amounts(total: i64, weights: &[Decimal]) -> Vec<i64> {
        allocate(Money::from_minor(total).unwrap(), &participants(weights))
            .unwrap()
            .iter()
            .map(|a| a.amount.minor())
            .collect()
    }

    #[test]
    fn test_permillage_without_remainder() {
        assert_eq!(amounts(10000, &[dec!(500), dec!(300), dec!(200)]), vec![5000, 3000, 2000]);
    }

    #[test]
    fn test_permillage_with_remainder() {
        assert_eq!(amounts(100, &[dec!(333), dec!(333), dec!(334)]), vec![33, 33, 34]);
    }

    #[test]
    fn test_tie_goes_to_earliest_participant() {
        assert_eq!(amounts(100, &[dec!(1), dec!(1), dec!(1)]), vec![34, 33, 33]);
        assert_eq!(amounts(2, &[dec!(1), dec!(1), dec!(1)]), vec![1, 1, 0]);
    }

    #[test]
    fn test_largest_remainder_wins_over_position() {
        // exact shares 3.2, 3.3, 3.5 -> floors 3, 3, 3 and one cent left
        assert_eq!(amounts(10, &[dec!(32), dec!(33), dec!(35)]), vec![3, 3, 4]);
    }

    #[test]
    fn test_zero_weight_receives_nothing() {
        assert_eq!(amounts(101, &[dec!(0), dec!(1), dec!(0), dec!(1)]), vec![0, 51, 0, 50]);
    }

    #[test]
    fn test_zero_total() {
        assert_eq!(amounts(0, &[dec!(250), dec!(750)]), vec![0, 0]);
    }

    #[test]
    fn test_fractional_weights() {
        assert_eq!(amounts(1000, &[dec!(0.5), dec!(0.25), dec!(0.25)]), vec![500, 250, 250]);
    }

    #[test]
    fn test_empty_participants() {
        let err = allocate::<usize>(Money::from_minor(1000).unwrap(), &[]).unwrap_err();
        assert_eq!(err, QuotaError::NoValidWeights);
    }

    #[test]
    fn test_negative_total() {
        let err = allocate(Money::from_minor(-1).unwrap(), &participants(&[dec!(1)])).unwrap_err();
        assert!(matches!(err, QuotaError::InvalidTotal(_)));
    }

    #[test]
    fn test_equal_mode_overrides_permillage() {
        let allocations = allocate_with_mode(
            Money::from_minor(1000).unwrap(),
            &participants(&[dec!(900), dec!(100)]),
            WeightMode::Equal,
        )
        .unwrap();
        assert_eq!(allocations[0].amount.minor(), 500);
        assert_eq!(allocations[1].amount.minor(), 500);
    }

    #[test]
    fn test_huge_weights_overflow() {
        let weights = [Decimal::MAX, Decimal::new(1, 28)];
        let err = allocate(Money::from_minor(100).unwrap(), &participants(&weights)).unwrap_err();
        assert_eq!(err, QuotaError::ArithmeticOverflow);
    }
}
