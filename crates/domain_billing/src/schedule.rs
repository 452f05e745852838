//! Quota schedules
//!
//! A schedule lists what every apartment owes, for which period and by when.
//! Entries are grouped by apartment (building order), then by period.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{ApartmentId, BillingMonth, Money, PeriodRef};
use domain_quota::WeightMode;

use crate::building::Building;
use crate::error::BillingResult;

/// Months in a billing year
const MONTHS_PER_YEAR: u32 = 12;

/// One amount owed by one apartment for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledQuota {
    pub apartment_id: ApartmentId,
    pub period: PeriodRef,
    pub due_date: NaiveDate,
    pub amount: Money,
}

/// Amounts owed by the apartments of a building
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSchedule {
    entries: Vec<ScheduledQuota>,
}

impl QuotaSchedule {
    pub fn new(entries: Vec<ScheduledQuota>) -> Self {
        Self { entries }
    }

    /// A fixed monthly charge, apportioned once and billed every month of `year`
    pub fn monthly(
        building: &Building,
        mode: WeightMode,
        year: i32,
        monthly_total: Money,
        due_day: u32,
    ) -> BillingResult<Self> {
        let months = due_months(year, due_day)?;
        let apportionment = building.charge(monthly_total, mode).apportion()?;

        let mut entries = Vec::with_capacity(apportionment.shares.len() * months.len());
        for share in &apportionment.shares {
            for (month, due_date) in &months {
                entries.push(ScheduledQuota {
                    apartment_id: share.participant_id,
                    period: PeriodRef::Month(*month),
                    due_date: *due_date,
                    amount: share.share,
                });
            }
        }

        info!(
            building_id = %building.id(),
            year,
            monthly_total = monthly_total.minor(),
            entries = entries.len(),
            "Generated monthly quota schedule"
        );

        Ok(Self { entries })
    }

    /// An annual budget, apportioned once and paid in twelve monthly installments
    ///
    /// Each apartment's annual share is split so that the earliest months
    /// carry the extra cents.
    pub fn from_annual_budget(
        building: &Building,
        mode: WeightMode,
        year: i32,
        annual_total: Money,
        due_day: u32,
    ) -> BillingResult<Self> {
        let months = due_months(year, due_day)?;
        let apportionment = building
            .charge(annual_total, mode)
            .with_installments(MONTHS_PER_YEAR)
            .apportion()?;

        let mut entries = Vec::with_capacity(apportionment.shares.len() * months.len());
        for share in &apportionment.shares {
            for (installment, (month, due_date)) in share.installments.iter().zip(&months) {
                entries.push(ScheduledQuota {
                    apartment_id: share.participant_id,
                    period: PeriodRef::Month(*month),
                    due_date: *due_date,
                    amount: installment.amount,
                });
            }
        }

        info!(
            building_id = %building.id(),
            year,
            annual_total = annual_total.minor(),
            entries = entries.len(),
            "Generated annual budget schedule"
        );

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ScheduledQuota] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all scheduled amounts
    pub fn total(&self) -> BillingResult<Money> {
        Ok(Money::try_sum(self.entries.iter().map(|e| e.amount))?)
    }

    /// Distinct periods, in chronological order
    pub fn periods(&self) -> Vec<PeriodRef> {
        self.entries
            .iter()
            .map(|e| e.period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct apartments, in order of first appearance
    pub fn apartments(&self) -> Vec<ApartmentId> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.apartment_id) {
                seen.push(entry.apartment_id);
            }
        }
        seen
    }

    pub fn for_apartment(&self, apartment_id: ApartmentId) -> impl Iterator<Item = &ScheduledQuota> {
        self.entries
            .iter()
            .filter(move |e| e.apartment_id == apartment_id)
    }

    pub fn entry(&self, apartment_id: ApartmentId, period: PeriodRef) -> Option<&ScheduledQuota> {
        self.entries
            .iter()
            .find(|e| e.apartment_id == apartment_id && e.period == period)
    }
}

/// Billing months of a year paired with their due dates
fn due_months(year: i32, due_day: u32) -> BillingResult<Vec<(BillingMonth, NaiveDate)>> {
    BillingMonth::months_of_year(year)?
        .into_iter()
        .map(|month| Ok((month, month.due_date(due_day)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::Apartment;
    use crate::error::BillingError;
    use core_kernel::PeriodError;
    use rust_decimal_macros::dec;

    fn building() -> Building {
        Building::new(
            "Edificio Sol",
            vec![
                Apartment::new("1A", dec!(333)),
                Apartment::new("1B", dec!(333)),
                Apartment::new("2A", dec!(334)),
            ],
        )
        .unwrap()
    }

    fn cents(minor: i64) -> Money {
        Money::from_minor(minor).unwrap()
    }

    #[test]
    fn test_monthly_repeats_the_same_share() {
        let building = building();
        let schedule = QuotaSchedule::monthly(&building, WeightMode::Permillage, 2025, cents(100), 8).unwrap();

        assert_eq!(schedule.entries().len(), 36);
        assert_eq!(schedule.periods().len(), 12);
        assert_eq!(schedule.total().unwrap(), cents(1200));

        let last = building.apartments()[2].id;
        assert!(schedule.for_apartment(last).all(|e| e.amount == cents(34)));
    }

    #[test]
    fn test_monthly_due_dates_clamp() {
        let building = building();
        let schedule = QuotaSchedule::monthly(&building, WeightMode::Equal, 2025, cents(300), 31).unwrap();
        let february = PeriodRef::Month(BillingMonth::new(2025, 2).unwrap());

        let entry = schedule.entry(building.apartments()[0].id, february).unwrap();
        assert_eq!(entry.due_date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_annual_budget_front_loads_cents() {
        let building = building();
        // 2A's annual share is 334 cents: 28 x 10 + 27 x 2
        let schedule =
            QuotaSchedule::from_annual_budget(&building, WeightMode::Permillage, 2025, cents(1000), 8).unwrap();

        let amounts: Vec<i64> = schedule
            .for_apartment(building.apartments()[2].id)
            .map(|e| e.amount.minor())
            .collect();
        assert_eq!(amounts, vec![28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 27, 27]);
        assert_eq!(schedule.total().unwrap(), cents(1000));
    }

    #[test]
    fn test_invalid_due_day_rejected() {
        let err = QuotaSchedule::monthly(&building(), WeightMode::Equal, 2025, cents(100), 0).unwrap_err();
        assert_eq!(err, BillingError::Period(PeriodError::InvalidDueDay(0)));
    }

    #[test]
    fn test_apartments_in_building_order() {
        let building = building();
        let schedule = QuotaSchedule::monthly(&building, WeightMode::Equal, 2025, cents(100), 8).unwrap();
        let expected: Vec<ApartmentId> = building.apartments().iter().map(|a| a.id).collect();
        assert_eq!(schedule.apartments(), expected);
    }
}
