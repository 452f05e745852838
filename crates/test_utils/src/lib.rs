//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! condominium quota test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data (amounts, dates, permillage tables)
//! - `builders`: Builder patterns for buildings, payments and projects
//! - `assertions`: Assertions for the apportionment invariants
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
