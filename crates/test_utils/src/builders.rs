//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::NaiveDate;
use core_kernel::{ApartmentId, BuildingId, Money, PeriodRef};
use domain_billing::{Apartment, Building, ExtraordinaryProject, Payment, PaymentMethod};
use domain_quota::{BalanceStatus, WeightMode};
use rust_decimal::Decimal;

use crate::fixtures::{DateFixtures, MoneyFixtures};

/// Builder for buildings
pub struct TestBuildingBuilder {
    name: String,
    id: Option<BuildingId>,
    apartments: Vec<Apartment>,
}

impl Default for TestBuildingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuildingBuilder {
    /// Creates a new builder with no apartments
    pub fn new() -> Self {
        Self {
            name: "Edificio Atlantico".to_string(),
            id: None,
            apartments: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_id(mut self, id: BuildingId) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds an apartment with the given permillage
    pub fn with_apartment(mut self, label: &str, permillage: Decimal) -> Self {
        self.apartments.push(Apartment::new(label, permillage));
        self
    }

    /// Adds `count` apartments labelled "1".."count" with equal permillage
    pub fn with_equal_apartments(mut self, count: u32) -> Self {
        for n in 1..=count {
            self.apartments.push(Apartment::new(n.to_string(), Decimal::ONE));
        }
        self
    }

    /// Builds the building; panics on invalid input
    pub fn build(self) -> Building {
        let building = Building::new(self.name, self.apartments)
            .unwrap_or_else(|e| panic!("invalid test building: {}", e));
        match self.id {
            Some(id) => building.with_id(id),
            None => building,
        }
    }
}

/// Builder for payments
pub struct TestPaymentBuilder {
    apartment_id: ApartmentId,
    period: PeriodRef,
    amount: Money,
    method: PaymentMethod,
    paid_on: NaiveDate,
    stored_status: Option<BalanceStatus>,
}

impl TestPaymentBuilder {
    /// Creates a builder for a full monthly quota payment in March 2025
    pub fn new(apartment_id: ApartmentId) -> Self {
        Self {
            apartment_id,
            period: DateFixtures::month(2025, 3),
            amount: MoneyFixtures::monthly_quota(),
            method: PaymentMethod::BankTransfer,
            paid_on: DateFixtures::past_due(),
            stored_status: None,
        }
    }

    pub fn for_period(mut self, period: PeriodRef) -> Self {
        self.period = period;
        self
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = method;
        self
    }

    pub fn paid_on(mut self, date: NaiveDate) -> Self {
        self.paid_on = date;
        self
    }

    /// Sets a stale stored status
    pub fn with_stored_status(mut self, status: BalanceStatus) -> Self {
        self.stored_status = Some(status);
        self
    }

    pub fn build(self) -> Payment {
        let payment = Payment::new(self.apartment_id, self.period, self.amount, self.method, self.paid_on);
        match self.stored_status {
            Some(status) => payment.with_stored_status(status),
            None => payment,
        }
    }
}

/// Builder for extraordinary projects
pub struct TestProjectBuilder {
    building_id: BuildingId,
    name: String,
    budget: Money,
    installments: u32,
    start_date: NaiveDate,
    mode: WeightMode,
}

impl TestProjectBuilder {
    /// A 12 000.00 project in 6 permillage-weighted installments from 31 January 2025
    pub fn new(building_id: BuildingId) -> Self {
        Self {
            building_id,
            name: "Roof repair".to_string(),
            budget: MoneyFixtures::project_budget(),
            installments: 6,
            start_date: DateFixtures::date(2025, 1, 31),
            mode: WeightMode::Permillage,
        }
    }

    pub fn with_budget(mut self, budget: Money) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_installments(mut self, installments: u32) -> Self {
        self.installments = installments;
        self
    }

    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    pub fn with_mode(mut self, mode: WeightMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> ExtraordinaryProject {
        ExtraordinaryProject::new(
            self.building_id,
            self.name,
            self.budget,
            self.installments,
            self.start_date,
            self.mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_building_builder() {
        let id = BuildingId::new();
        let building = TestBuildingBuilder::new()
            .with_id(id)
            .with_apartment("1A", dec!(600))
            .with_apartment("1B", dec!(400))
            .build();

        assert_eq!(building.id(), id);
        assert_eq!(building.apartments().len(), 2);
        assert_eq!(building.permillage_total(), Some(dec!(1000)));
    }

    #[test]
    fn test_equal_apartments() {
        let building = TestBuildingBuilder::new().with_equal_apartments(4).build();
        assert_eq!(building.apartments()[3].label, "4");
    }

    #[test]
    fn test_payment_defaults() {
        let apartment = ApartmentId::new();
        let payment = TestPaymentBuilder::new(apartment).build();

        assert_eq!(payment.apartment_id, apartment);
        assert_eq!(payment.amount, MoneyFixtures::monthly_quota());
        assert!(payment.stored_status.is_none());
    }
}
