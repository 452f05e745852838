//! Charges and their apportionment
//!
//! A [`Charge`] bundles everything needed to divide one expense: the total,
//! the participants with their weights, the weight mode and the number of
//! installments each share is paid in.

use core_kernel::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::allocation::allocate_with_mode;
use crate::error::{QuotaError, QuotaResult};
use crate::installments::{validate_count, Installment};
use crate::weights::{Participant, WeightMode};

/// An expense to be divided among participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge<Id> {
    pub total: Money,
    pub participants: Vec<Participant<Id>>,
    pub mode: WeightMode,
    pub installments: u32,
}

impl<Id: Clone> Charge<Id> {
    /// Creates a charge payable in a single installment
    pub fn new(total: Money, participants: Vec<Participant<Id>>, mode: WeightMode) -> Self {
        Self {
            total,
            participants,
            mode,
            installments: 1,
        }
    }

    /// Sets the number of installments per share
    pub fn with_installments(mut self, installments: u32) -> Self {
        self.installments = installments;
        self
    }

    /// Allocates the total and splits every share into installments
    ///
    /// The installment count is validated before any allocation happens.
    #[instrument(skip(self), fields(total = self.total.minor(), participants = self.participants.len()))]
    pub fn apportion(&self) -> QuotaResult<Apportionment<Id>> {
        validate_count(self.installments)?;

        let allocations = allocate_with_mode(self.total, &self.participants, self.mode)?;
        let shares = allocations
            .into_iter()
            .map(|allocation| {
                Ok(ParticipantSchedule {
                    installments: Installment::schedule(allocation.amount, self.installments)?,
                    participant_id: allocation.participant_id,
                    share: allocation.amount,
                })
            })
            .collect::<QuotaResult<Vec<_>>>()?;

        debug!(installments = self.installments, "Apportioned charge");

        Ok(Apportionment {
            total: self.total,
            installment_count: self.installments,
            shares,
        })
    }
}

/// A participant's share and its installment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSchedule<Id> {
    pub participant_id: Id,
    pub share: Money,
    pub installments: Vec<Installment>,
}

/// Result of apportioning a charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apportionment<Id> {
    pub total: Money,
    pub installment_count: u32,
    pub shares: Vec<ParticipantSchedule<Id>>,
}

impl<Id: PartialEq> Apportionment<Id> {
    /// Sum of all shares; equals `total`
    pub fn total_allocated(&self) -> QuotaResult<Money> {
        Ok(Money::try_sum(self.shares.iter().map(|s| s.share))?)
    }

    /// Amount due across all participants for each installment position
    pub fn installment_totals(&self) -> QuotaResult<Vec<Money>> {
        let mut totals = vec![Money::ZERO; self.installment_count as usize];
        for schedule in &self.shares {
            for (slot, installment) in totals.iter_mut().zip(&schedule.installments) {
                *slot = slot.checked_add(installment.amount)?;
            }
        }
        Ok(totals)
    }

    pub fn share_for(&self, participant_id: &Id) -> Option<&ParticipantSchedule<Id>> {
        self.shares.iter().find(|s| s.participant_id == *participant_id)
    }

    /// Amount due from a participant for one installment
    pub fn installment_for(&self, participant_id: &Id, index: u32) -> QuotaResult<Money> {
        if index == 0 || index > self.installment_count {
            return Err(QuotaError::InvalidInstallmentCount(i64::from(index)));
        }
        Ok(self
            .share_for(participant_id)
            .and_then(|s| s.installments.iter().find(|i| i.index == index))
            .map(|i| i.amount)
            .unwrap_or(Money::ZERO))
    }
}
