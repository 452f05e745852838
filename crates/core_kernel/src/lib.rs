//! Core Kernel - Foundational types for the condominium quota engine
//!
//! This crate provides the building blocks shared by every other crate:
//! - Money as integer minor units with overflow-checked arithmetic
//! - Billing periods (calendar months and installment positions) with due dates
//! - Strongly-typed identifiers for buildings, apartments, projects and payments

pub mod money;
pub mod period;
pub mod identifiers;

pub use money::{Currency, Money, MoneyError, MAX_SAFE_MINOR};
pub use period::{installment_due_date, BillingMonth, PeriodError, PeriodRef};
pub use identifiers::{ApartmentId, BuildingId, PaymentId, ProjectId};
