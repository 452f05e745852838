//! Pre-built Test Fixtures
//!
//! Ready-to-use amounts, dates and permillage tables. Values are fixed so
//! expected results can be written out by hand in tests.

use chrono::NaiveDate;
use core_kernel::{BillingMonth, Money, PeriodRef};
use domain_billing::{Apartment, Building};
use domain_quota::Participant;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Money in minor units; panics outside the safe range
pub fn cents(minor: i64) -> Money {
    Money::from_minor(minor).unwrap_or_else(|e| panic!("bad fixture amount {}: {}", minor, e))
}

/// Minor units of each amount, for compact assertions
pub fn minors(amounts: &[Money]) -> Vec<i64> {
    amounts.iter().map(|m| m.minor()).collect()
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A monthly condominium quota of 500.00
    pub fn monthly_quota() -> Money {
        cents(50_000)
    }

    /// An annual budget of 60 000.00
    pub fn annual_budget() -> Money {
        cents(6_000_000)
    }

    /// A roof repair of 12 000.00
    pub fn project_budget() -> Money {
        cents(1_200_000)
    }

    /// One euro, the smallest amount that shows rounding with three apartments
    pub fn one_euro() -> Money {
        cents(100)
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| panic!("bad fixture date {}-{}-{}", year, month, day))
    }

    /// Reference "today" for status tests (10 March 2025)
    pub fn today() -> NaiveDate {
        Self::date(2025, 3, 10)
    }

    /// Due date that has already passed relative to [`DateFixtures::today`]
    pub fn past_due() -> NaiveDate {
        Self::date(2025, 3, 8)
    }

    /// Due date still ahead of [`DateFixtures::today`]
    pub fn future_due() -> NaiveDate {
        Self::date(2025, 4, 8)
    }

    pub fn month(year: i32, month: u32) -> PeriodRef {
        PeriodRef::Month(
            BillingMonth::new(year, month).unwrap_or_else(|e| panic!("bad fixture month: {}", e)),
        )
    }
}

/// Fixture for permillage tables and buildings
pub struct BuildingFixtures;

impl BuildingFixtures {
    /// Three apartments at 333/333/334
    pub fn thirds() -> Vec<(&'static str, Decimal)> {
        vec![("1A", dec!(333)), ("1B", dec!(333)), ("2A", dec!(334))]
    }

    /// Six apartments of mixed sizes summing to 1000
    pub fn mixed() -> Vec<(&'static str, Decimal)> {
        vec![
            ("RC-E", dec!(120.5)),
            ("RC-D", dec!(130)),
            ("1E", dec!(175.25)),
            ("1D", dec!(174.75)),
            ("2E", dec!(199.5)),
            ("2D", dec!(200)),
        ]
    }

    /// Engine participants keyed by label
    pub fn participants(table: &[(&'static str, Decimal)]) -> Vec<Participant<&'static str>> {
        table
            .iter()
            .map(|(label, weight)| Participant::new(*label, *weight))
            .collect()
    }

    /// A building with the given permillage table
    pub fn building(table: &[(&'static str, Decimal)]) -> Building {
        let apartments = table
            .iter()
            .map(|(label, permillage)| Apartment::new(*label, *permillage))
            .collect();
        Building::new("Edificio Atlantico", apartments)
            .unwrap_or_else(|e| panic!("bad fixture building: {}", e))
    }
}
