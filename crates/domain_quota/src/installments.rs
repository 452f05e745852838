//! Installment splitting
//!
//! A share is divided into `n` ordered installments. The first
//! `total % n` installments carry one extra minor unit, so the amounts add
//! up exactly and no two installments differ by more than one unit.

use core_kernel::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuotaError, QuotaResult};

/// Upper bound on installments per charge (100 years of monthly payments)
pub const MAX_INSTALLMENTS: u32 = 1200;

/// One scheduled partial payment of a share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based position in the schedule
    pub index: u32,
    /// Amount due for this installment
    pub amount: Money,
}

impl Installment {
    /// Splits `total` into `n` installments tagged with their position
    pub fn schedule(total: Money, n: u32) -> QuotaResult<Vec<Installment>> {
        let amounts = split_into_installments(total, n)?;
        Ok(amounts
            .into_iter()
            .zip(1u32..)
            .map(|(amount, index)| Installment { index, amount })
            .collect())
    }
}

/// Splits `total` into `n` installment amounts
///
/// # Errors
///
/// * `InvalidInstallmentCount` - `n` is zero or above [`MAX_INSTALLMENTS`]
/// * `InvalidTotal` - `total` is negative
///
/// # Example
///
/// ```rust
/// use core_kernel::Money;
/// use domain_quota::split_into_installments;
///
/// let parts = split_into_installments(Money::from_minor(1000).unwrap(), 3).unwrap();
/// let cents: Vec<i64> = parts.iter().map(|m| m.minor()).collect();
/// assert_eq!(cents, vec![334, 333, 333]);
/// ```
pub fn split_into_installments(total: Money, n: u32) -> QuotaResult<Vec<Money>> {
    validate_count(n)?;
    if total.is_negative() {
        return Err(QuotaError::negative_total(total));
    }

    let count = i64::from(n);
    let base = total.minor() / count;
    let remainder = total.minor() % count;

    let mut installments = Vec::with_capacity(n as usize);
    for position in 0..count {
        let minor = if position < remainder { base + 1 } else { base };
        installments.push(Money::from_minor(minor)?);
    }

    debug!(
        total = total.minor(),
        installments = n,
        base,
        remainder,
        "Split total into installments"
    );

    Ok(installments)
}

/// Validates an installment count received as a plain integer
///
/// Zero, negative and oversized counts are all `InvalidInstallmentCount`.
pub fn checked_installment_count(raw: i64) -> QuotaResult<u32> {
    let n = u32::try_from(raw).map_err(|_| QuotaError::InvalidInstallmentCount(raw))?;
    validate_count(n)?;
    Ok(n)
}

pub(crate) fn validate_count(n: u32) -> QuotaResult<()> {
    if n == 0 || n > MAX_INSTALLMENTS {
        return Err(QuotaError::InvalidInstallmentCount(i64::from(n)));
    }
    Ok(())
}
