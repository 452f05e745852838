//! Balance and payment status
//!
//! The status of a quota is always derived from the allocated amount, the
//! payments recorded against it, its due date and the current date. A status
//! stored alongside a payment row is only a cache and is never consulted.

use chrono::NaiveDate;
use core_kernel::{Money, PeriodRef};
use serde::{Deserialize, Serialize};

use crate::error::{QuotaError, QuotaResult};

/// Payment status of an allocated quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Nothing left to pay (overpayment included)
    Paid,
    /// Something paid, something still owed
    Partial,
    /// Nothing paid, due date not yet passed
    Pending,
    /// Nothing paid and the due date has passed
    Late,
}

impl BalanceStatus {
    /// Returns true when nothing is owed
    pub fn is_settled(&self) -> bool {
        matches!(self, BalanceStatus::Paid)
    }
}

/// A payment recorded against a participant's quota for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord<Id> {
    pub participant_id: Id,
    pub period: PeriodRef,
    pub amount_paid: Money,
    /// Status persisted with the row; informational only
    #[serde(default)]
    pub recorded_status: Option<BalanceStatus>,
}

impl<Id> PaymentRecord<Id> {
    pub fn new(participant_id: Id, period: PeriodRef, amount_paid: Money) -> Self {
        Self {
            participant_id,
            period,
            amount_paid,
            recorded_status: None,
        }
    }
}

/// Balance and status of an allocated amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// `allocated - paid`; negative when overpaid
    pub balance: Money,
    pub status: BalanceStatus,
}

/// Balance of one participant for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult<Id> {
    pub participant_id: Id,
    pub period: PeriodRef,
    pub allocated: Money,
    pub paid: Money,
    /// Signed `allocated - paid`, kept for auditing overpayments
    pub balance: Money,
    pub status: BalanceStatus,
}

impl<Id> BalanceResult<Id> {
    /// Balance as shown to residents, never below zero
    pub fn display_balance(&self) -> Money {
        self.balance.non_negative()
    }

    /// Amount paid beyond the allocation
    pub fn overpayment(&self) -> Money {
        (-self.balance).non_negative()
    }

    /// Part of the payments that counts towards this quota
    pub fn applied(&self) -> Money {
        self.paid.non_negative().min(self.allocated)
    }

    /// Part of the allocation not yet covered
    pub fn outstanding(&self) -> Money {
        // applied <= allocated, so the subtraction stays in range
        self.allocated.checked_sub(self.applied()).unwrap_or(Money::ZERO)
    }
}

/// Derives balance and status from amounts and dates
///
/// Precedence: a non-positive balance is `Paid`; anything paid with a
/// positive balance is `Partial`; otherwise `Late` once `today` is past the
/// due date and `Pending` before that (or when there is no due date).
/// A net non-positive `paid` (refunds) counts as nothing paid.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use core_kernel::Money;
/// use domain_quota::{assess_balance, BalanceStatus};
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let due = today.pred_opt();
/// let allocated = Money::from_minor(5000).unwrap();
///
/// let summary = assess_balance(allocated, Money::ZERO, due, today).unwrap();
/// assert_eq!(summary.status, BalanceStatus::Late);
/// ```
pub fn assess_balance(
    allocated: Money,
    paid: Money,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> QuotaResult<BalanceSummary> {
    if allocated.is_negative() {
        return Err(QuotaError::negative_total(allocated));
    }

    let balance = allocated.checked_sub(paid)?;
    let status = if !balance.is_positive() {
        BalanceStatus::Paid
    } else if paid.is_positive() {
        BalanceStatus::Partial
    } else if due_date.is_some_and(|due| today > due) {
        BalanceStatus::Late
    } else {
        BalanceStatus::Pending
    };

    Ok(BalanceSummary { balance, status })
}

/// Computes the balance of `participant_id` for `period`
///
/// Only records matching both the participant and the period count as paid.
pub fn compute_balance<Id>(
    participant_id: &Id,
    period: PeriodRef,
    allocated: Money,
    records: &[PaymentRecord<Id>],
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> QuotaResult<BalanceResult<Id>>
where
    Id: Clone + PartialEq,
{
    let paid = Money::try_sum(
        records
            .iter()
            .filter(|record| record.participant_id == *participant_id && record.period == period)
            .map(|record| record.amount_paid),
    )?;
    let summary = assess_balance(allocated, paid, due_date, today)?;

    Ok(BalanceResult {
        participant_id: participant_id.clone(),
        period,
        allocated,
        paid,
        balance: summary.balance,
        status: summary.status,
    })
}
