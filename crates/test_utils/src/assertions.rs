//! Custom Test Assertions
//!
//! Assertion helpers for the apportionment invariants, with failure messages
//! that show the offending amounts.

use core_kernel::Money;
use domain_quota::{Allocation, BalanceStatus};

/// Asserts that the parts add up exactly to the total
pub fn assert_money_sum_equals(parts: &[Money], total: Money) {
    let sum = Money::try_sum(parts.iter().copied())
        .unwrap_or_else(|e| panic!("Sum of parts overflowed: {}", e));
    assert_eq!(
        sum,
        total,
        "Sum of parts ({}) doesn't equal total ({}); parts={:?}",
        sum,
        total,
        parts.iter().map(|m| m.minor()).collect::<Vec<_>>()
    );
}

/// Asserts that an allocation conserves its total
pub fn assert_conserves_total<Id: std::fmt::Debug>(allocations: &[Allocation<Id>], total: Money) {
    let amounts: Vec<Money> = allocations.iter().map(|a| a.amount).collect();
    assert_money_sum_equals(&amounts, total);
}

/// Asserts that no two amounts differ by more than one minor unit
pub fn assert_fair_spread(amounts: &[Money]) {
    let (Some(min), Some(max)) = (amounts.iter().min(), amounts.iter().max()) else {
        return;
    };
    assert!(
        max.minor() - min.minor() <= 1,
        "Amounts spread by more than one minor unit: min={}, max={}",
        min.minor(),
        max.minor()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that every amount is zero or positive
pub fn assert_all_non_negative(amounts: &[Money]) {
    if let Some(negative) = amounts.iter().find(|m| m.is_negative()) {
        panic!("Expected no negative amounts, found {}", negative);
    }
}

/// Asserts that a status is the expected one, naming both on failure
pub fn assert_status(actual: BalanceStatus, expected: BalanceStatus) {
    assert_eq!(actual, expected, "Expected status {:?}, got {:?}", expected, actual);
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
