//! Billing domain errors

use core_kernel::{BuildingId, MoneyError, PeriodError};
use domain_quota::QuotaError;
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BillingError {
    /// Apportionment engine rejected the input
    #[error(transparent)]
    Quota(#[from] QuotaError),

    /// Money arithmetic failed
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Bad month, due day or date range
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Two apartments share an id or a label
    #[error("Duplicate apartment: {0}")]
    DuplicateApartment(String),

    /// A project was planned against another building
    #[error("Project belongs to building {expected}, not {actual}")]
    BuildingMismatch {
        expected: BuildingId,
        actual: BuildingId,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl BillingError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            BillingError::Quota(err) => err.code(),
            BillingError::Money(MoneyError::ArithmeticOverflow) => "arithmetic_overflow",
            BillingError::Money(MoneyError::UnknownCurrency(_)) => "unknown_currency",
            BillingError::Money(MoneyError::InvalidAmount(_)) => "invalid_amount",
            BillingError::Period(PeriodError::InvalidDueDay(_)) => "invalid_due_day",
            BillingError::Period(_) => "invalid_period",
            BillingError::DuplicateApartment(_) => "duplicate_apartment",
            BillingError::BuildingMismatch { .. } => "building_mismatch",
            BillingError::InvalidConfiguration(_) => "invalid_configuration",
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
