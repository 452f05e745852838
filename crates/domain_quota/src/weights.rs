//! Weight normalization
//!
//! Participants carry a raw weight: an apartment's permillage, or 1 when a
//! charge is split equally. Before any division the weights are rescaled to
//! a common decimal scale and held as exact integers, so shares and their
//! remainders are compared without rounding error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocation::largest_remainder;
use crate::error::{QuotaError, QuotaResult};

/// Sum of a complete permillage table
pub const PERMILLAGE_TOTAL: u32 = 1000;

/// How stored weights are interpreted for a charge
///
/// Has no `Default`: every charge names its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMode {
    /// Every participant counts once; stored weights are ignored
    Equal,
    /// Stored weights (usually permillage) are used as given
    Permillage,
}

/// A party to a charge and its raw weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant<Id> {
    pub id: Id,
    pub weight: Decimal,
}

impl<Id> Participant<Id> {
    pub fn new(id: Id, weight: Decimal) -> Self {
        Self { id, weight }
    }

    /// A participant with weight 1
    pub fn equal(id: Id) -> Self {
        Self {
            id,
            weight: Decimal::ONE,
        }
    }
}

/// A participant's fraction of the total weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedWeight<Id> {
    pub id: Id,
    /// Fraction in `0..=1`
    pub share: Decimal,
}

/// A participant's integer permillage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermillageShare<Id> {
    pub id: Id,
    pub permillage: u32,
}

/// Returns the participants with weights as the mode dictates
pub fn apply_mode<Id: Clone>(participants: &[Participant<Id>], mode: WeightMode) -> Vec<Participant<Id>> {
    match mode {
        WeightMode::Permillage => participants.to_vec(),
        WeightMode::Equal => participants
            .iter()
            .map(|p| Participant::equal(p.id.clone()))
            .collect(),
    }
}

/// Normalizes weights into fractions of their sum
///
/// Fractions are exact up to `Decimal` precision (28 significant digits);
/// use [`normalize_to_permillage`] when integers with an exact sum are needed.
///
/// # Errors
///
/// * `InvalidWeight` - a weight is negative
/// * `NoValidWeights` - the list is empty or every weight is zero
pub fn normalize<Id: Clone>(
    participants: &[Participant<Id>],
    mode: WeightMode,
) -> QuotaResult<Vec<NormalizedWeight<Id>>> {
    let effective = apply_mode(participants, mode);
    WeightUnits::from_participants(&effective)?;

    let total = effective
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.weight))
        .ok_or(QuotaError::ArithmeticOverflow)?;

    effective
        .into_iter()
        .map(|p| {
            let share = p
                .weight
                .checked_div(total)
                .ok_or(QuotaError::ArithmeticOverflow)?;
            Ok(NormalizedWeight { id: p.id, share })
        })
        .collect()
}

/// Normalizes weights into integer permillages summing to exactly 1000
///
/// Uses the same largest-remainder rule as money allocation: floors first,
/// then the leftover points go to the largest remainders, ties to the
/// earliest participant.
pub fn normalize_to_permillage<Id: Clone>(
    participants: &[Participant<Id>],
    mode: WeightMode,
) -> QuotaResult<Vec<PermillageShare<Id>>> {
    let effective = apply_mode(participants, mode);
    let units = WeightUnits::from_participants(&effective)?;
    let points = largest_remainder(i128::from(PERMILLAGE_TOTAL), &units)?;

    debug!(participants = effective.len(), "Normalized weights to permillage");

    effective
        .into_iter()
        .zip(points)
        .map(|(p, permillage)| {
            let permillage = u32::try_from(permillage).map_err(|_| QuotaError::ArithmeticOverflow)?;
            Ok(PermillageShare { id: p.id, permillage })
        })
        .collect()
}

/// Weights rescaled to a common decimal scale, as exact integers
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WeightUnits {
    pub(crate) units: Vec<i128>,
    pub(crate) total: i128,
}

impl WeightUnits {
    /// Validates weights and converts them to integer units
    ///
    /// `[0.5, 1.25]` becomes `[50, 125]` with total 175.
    pub(crate) fn from_participants<Id>(participants: &[Participant<Id>]) -> QuotaResult<Self> {
        let mut scale = 0;
        for (index, participant) in participants.iter().enumerate() {
            if participant.weight < Decimal::ZERO {
                return Err(QuotaError::InvalidWeight {
                    index,
                    weight: participant.weight,
                });
            }
            scale = scale.max(participant.weight.normalize().scale());
        }

        let mut units = Vec::with_capacity(participants.len());
        let mut total: i128 = 0;
        for participant in participants {
            let weight = participant.weight.normalize();
            let factor = 10_i128
                .checked_pow(scale - weight.scale())
                .ok_or(QuotaError::ArithmeticOverflow)?;
            let unit = weight
                .mantissa()
                .checked_mul(factor)
                .ok_or(QuotaError::ArithmeticOverflow)?;
            total = total.checked_add(unit).ok_or(QuotaError::ArithmeticOverflow)?;
            units.push(unit);
        }

        if total <= 0 {
            return Err(QuotaError::NoValidWeights);
        }

        Ok(Self { units, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn participants(weights: &[Decimal]) -> Vec<Participant<usize>> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| Participant::new(i, *w))
            .collect()
    }

    #[test]
    fn test_units_share_common_scale() {
        let units = WeightUnits::from_participants(&participants(&[dec!(0.5), dec!(1.25), dec!(2)])).unwrap();
        assert_eq!(units.units, vec![50, 125, 200]);
        assert_eq!(units.total, 375);
    }

    #[test]
    fn test_trailing_zeros_do_not_inflate_scale() {
        let units = WeightUnits::from_participants(&participants(&[dec!(500.000), dec!(500)])).unwrap();
        assert_eq!(units.units, vec![500, 500]);
    }

    #[test]
    fn test_negative_weight_reports_position() {
        let err = WeightUnits::from_participants(&participants(&[dec!(1), dec!(-2)])).unwrap_err();
        assert_eq!(err, QuotaError::InvalidWeight { index: 1, weight: dec!(-2) });
    }

    #[test]
    fn test_all_zero_weights() {
        let err = WeightUnits::from_participants(&participants(&[dec!(0), dec!(0)])).unwrap_err();
        assert_eq!(err, QuotaError::NoValidWeights);
    }

    #[test]
    fn test_empty_list() {
        let err = WeightUnits::from_participants::<usize>(&[]).unwrap_err();
        assert_eq!(err, QuotaError::NoValidWeights);
    }

    #[test]
    fn test_normalize_fractions() {
        let shares = normalize(&participants(&[dec!(500), dec!(300), dec!(200)]), WeightMode::Permillage).unwrap();
        let values: Vec<Decimal> = shares.iter().map(|s| s.share).collect();
        assert_eq!(values, vec![dec!(0.5), dec!(0.3), dec!(0.2)]);
    }

    #[test]
    fn test_equal_mode_ignores_stored_weights() {
        let shares = normalize(&participants(&[dec!(700), dec!(0), dec!(300), dec!(0)]), WeightMode::Equal).unwrap();
        assert!(shares.iter().all(|s| s.share == dec!(0.25)));
    }

    #[test]
    fn test_equal_mode_ignores_negative_stored_weights() {
        let shares = normalize(&participants(&[dec!(-5), dec!(5)]), WeightMode::Equal).unwrap();
        assert_eq!(shares[0].share, dec!(0.5));
    }

    #[test]
    fn test_permillage_sums_to_thousand() {
        let shares = normalize_to_permillage(&participants(&[dec!(1), dec!(1), dec!(1)]), WeightMode::Permillage).unwrap();
        let points: Vec<u32> = shares.iter().map(|s| s.permillage).collect();
        assert_eq!(points, vec![334, 333, 333]);
    }

    #[test]
    fn test_permillage_from_areas() {
        // 85.5 m2, 120 m2, 64.5 m2 -> 270 m2 total
        let shares = normalize_to_permillage(
            &participants(&[dec!(85.5), dec!(120), dec!(64.5)]),
            WeightMode::Permillage,
        )
        .unwrap();
        let points: Vec<u32> = shares.iter().map(|s| s.permillage).collect();
        assert_eq!(points, vec![317, 444, 239]);
        assert_eq!(points.iter().sum::<u32>(), PERMILLAGE_TOTAL);
    }
}
