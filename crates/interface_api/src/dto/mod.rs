//! Request/response data transfer objects
//!
//! Requests carry amounts as integer minor units in `*_cents` fields.
//! Responses render every amount as an [`AmountView`].

pub mod quota;
pub mod billing;

use core_kernel::{Currency, Money};
use serde::Serialize;

/// An amount with its formatted rendering
#[derive(Debug, Clone, Serialize)]
pub struct AmountView {
    pub cents: i64,
    pub formatted: String,
}

impl AmountView {
    pub fn new(amount: Money, currency: Currency) -> Self {
        Self {
            cents: amount.minor(),
            formatted: amount.format(currency),
        }
    }
}
