//! Billing Domain - Condominium Quotas
//!
//! Builds on the apportionment engine to bill a building's apartments:
//!
//! - **Buildings**: apartments and their permillage table
//! - **Quota schedules**: recurring monthly quotas, either a fixed monthly
//!   charge or an annual budget spread over twelve months
//! - **Extraordinary projects**: a one-off budget paid in installments
//! - **Payment grid**: apartments by period, each cell a derived balance
//! - **Collection stats**: the figures shown on the dashboard cards
//!
//! Statuses are never stored: every cell is recomputed from the schedule,
//! the payments and the current date.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use core_kernel::Money;
//! use domain_billing::{Apartment, Building, PaymentGrid, QuotaSchedule};
//! use domain_quota::WeightMode;
//! use rust_decimal::Decimal;
//!
//! let building = Building::new(
//!     "Rua das Flores 12",
//!     vec![
//!         Apartment::new("1A", Decimal::from(400)),
//!         Apartment::new("1B", Decimal::from(600)),
//!     ],
//! )
//! .unwrap();
//!
//! let monthly = Money::from_minor(50_000).unwrap();
//! let schedule = QuotaSchedule::monthly(&building, WeightMode::Permillage, 2025, monthly, 8).unwrap();
//! assert_eq!(schedule.entries().len(), 24);
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
//! let grid = PaymentGrid::build(&schedule, &[], today).unwrap();
//! assert_eq!(grid.rows().len(), 2);
//! ```

pub mod building;
pub mod payment;
pub mod schedule;
pub mod project;
pub mod grid;
pub mod stats;
pub mod error;

pub use building::{Apartment, Building};
pub use payment::{records, Payment, PaymentMethod};
pub use schedule::{QuotaSchedule, ScheduledQuota};
pub use project::{ApartmentProgress, ExtraordinaryProject, ProjectSummary};
pub use grid::{ColumnTotal, GridRow, PaymentGrid};
pub use stats::{CollectionStats, StatusCounts};
pub use error::{BillingError, BillingResult};
