//! Quota Apportionment Engine
//!
//! Pure, stateless arithmetic for dividing condominium charges fairly:
//!
//! - **Installment splitting**: a share is divided into `n` installments whose
//!   amounts differ by at most one minor unit and add up exactly
//! - **Weight normalization**: permillage tables (or equal shares) become exact
//!   proportions, or integer permillages summing to 1000
//! - **Allocation**: a total is apportioned across weighted participants with
//!   the largest-remainder (Hamilton) method, so no cent is lost or invented
//! - **Balance status**: allocated amounts are compared with recorded payments
//!   to derive `paid`, `partial`, `pending` or `late`
//!
//! Every operation is a deterministic function of its inputs. Nothing here
//! performs I/O or keeps state between calls.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::Money;
//! use domain_quota::{allocate, split_into_installments, Participant};
//! use rust_decimal::Decimal;
//!
//! let total = Money::from_minor(100).unwrap();
//! let apartments = vec![
//!     Participant::new("1A", Decimal::from(333)),
//!     Participant::new("1B", Decimal::from(333)),
//!     Participant::new("2A", Decimal::from(334)),
//! ];
//!
//! let shares: Vec<i64> = allocate(total, &apartments)
//!     .unwrap()
//!     .iter()
//!     .map(|a| a.amount.minor())
//!     .collect();
//! assert_eq!(shares, vec![33, 33, 34]);
//!
//! let installments = split_into_installments(Money::from_minor(1000).unwrap(), 3).unwrap();
//! assert_eq!(installments.iter().map(|m| m.minor()).collect::<Vec<_>>(), vec![334, 333, 333]);
//! ```

pub mod error;
pub mod installments;
pub mod weights;
pub mod allocation;
pub mod balance;
pub mod charge;

pub use error::{QuotaError, QuotaResult};
pub use installments::{
    checked_installment_count, split_into_installments, Installment, MAX_INSTALLMENTS,
};
pub use weights::{
    apply_mode, normalize, normalize_to_permillage, NormalizedWeight, Participant,
    PermillageShare, WeightMode, PERMILLAGE_TOTAL,
};
pub use allocation::{allocate, allocate_with_mode, Allocation};
pub use balance::{
    assess_balance, compute_balance, BalanceResult, BalanceStatus, BalanceSummary, PaymentRecord,
};
pub use charge::{Apportionment, Charge, ParticipantSchedule};
