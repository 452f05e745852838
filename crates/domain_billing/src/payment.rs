//! Payment records
//!
//! A payment settles (part of) an apartment's quota for one period. Refunds
//! and corrections are negative payments against the same period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{ApartmentId, Money, PaymentId, PeriodRef};
use domain_quota::{BalanceStatus, PaymentRecord};

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer
    BankTransfer,
    /// Cash handed to the administrator
    Cash,
    /// Card
    Card,
    /// Direct debit
    DirectDebit,
    /// Check/cheque
    Check,
}

/// A payment made by an apartment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Paying apartment
    pub apartment_id: ApartmentId,
    /// Quota period being paid
    pub period: PeriodRef,
    /// Amount; negative for refunds
    pub amount: Money,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    /// External reference (bank ref, receipt number)
    pub reference: Option<String>,
    /// Status persisted by an earlier run; never trusted
    #[serde(default)]
    pub stored_status: Option<BalanceStatus>,
}

impl Payment {
    /// Creates a new payment
    pub fn new(
        apartment_id: ApartmentId,
        period: PeriodRef,
        amount: Money,
        method: PaymentMethod,
        paid_on: NaiveDate,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            apartment_id,
            period,
            amount,
            method,
            paid_on,
            reference: None,
            stored_status: None,
        }
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_stored_status(mut self, status: BalanceStatus) -> Self {
        self.stored_status = Some(status);
        self
    }

    /// The engine's view of this payment
    pub fn to_record(&self) -> PaymentRecord<ApartmentId> {
        PaymentRecord {
            participant_id: self.apartment_id,
            period: self.period,
            amount_paid: self.amount,
            recorded_status: self.stored_status,
        }
    }
}

/// Converts payments into engine records
pub fn records(payments: &[Payment]) -> Vec<PaymentRecord<ApartmentId>> {
    payments.iter().map(Payment::to_record).collect()
}
