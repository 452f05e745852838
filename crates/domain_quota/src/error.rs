//! Apportionment engine errors

use core_kernel::{Money, MoneyError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures of the apportionment engine
///
/// Every variant describes bad input or an impossible magnitude. None of
/// them is transient, so callers report rather than retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuotaError {
    /// Negative or otherwise unusable total amount
    #[error("Invalid total: {0}")]
    InvalidTotal(String),

    /// Installment count outside 1..=MAX_INSTALLMENTS
    #[error("Invalid installment count: {0}")]
    InvalidInstallmentCount(i64),

    /// Negative participant weight
    #[error("Invalid weight {weight} for participant at position {index}")]
    InvalidWeight { index: usize, weight: Decimal },

    /// Empty participant list or all weights zero
    #[error("No valid weights: at least one participant needs a positive weight")]
    NoValidWeights,

    /// An intermediate or final value left the representable range
    #[error("Arithmetic overflow during apportionment")]
    ArithmeticOverflow,
}

impl QuotaError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            QuotaError::InvalidTotal(_) => "invalid_total",
            QuotaError::InvalidInstallmentCount(_) => "invalid_installment_count",
            QuotaError::InvalidWeight { .. } => "invalid_weight",
            QuotaError::NoValidWeights => "no_valid_weights",
            QuotaError::ArithmeticOverflow => "arithmetic_overflow",
        }
    }

    pub(crate) fn negative_total(total: Money) -> Self {
        QuotaError::InvalidTotal(format!("{} minor units is negative", total.minor()))
    }
}

impl From<MoneyError> for QuotaError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::ArithmeticOverflow => QuotaError::ArithmeticOverflow,
            other => QuotaError::InvalidTotal(other.to_string()),
        }
    }
}

/// Result type of every engine operation
pub type QuotaResult<T> = Result<T, QuotaError>;
