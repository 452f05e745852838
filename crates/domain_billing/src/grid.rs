//! Payment grid
//!
//! Apartments by periods, each cell the derived balance of one scheduled
//! quota. This is the data behind the quota overview table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{ApartmentId, Money, PeriodRef};
use domain_quota::{compute_balance, BalanceResult, BalanceStatus};

use crate::error::BillingResult;
use crate::payment::{records, Payment};
use crate::schedule::QuotaSchedule;

/// One apartment's line of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub apartment_id: ApartmentId,
    /// One cell per scheduled period, in chronological order
    pub cells: Vec<BalanceResult<ApartmentId>>,
    pub allocated: Money,
    pub paid: Money,
    pub balance: Money,
}

impl GridRow {
    /// Overall status of the apartment
    ///
    /// `Paid` when every cell is paid, `Late` as soon as one cell is late,
    /// `Partial` when something was paid, `Pending` otherwise.
    pub fn status(&self) -> BalanceStatus {
        if self.cells.iter().all(|c| c.status == BalanceStatus::Paid) {
            BalanceStatus::Paid
        } else if self.cells.iter().any(|c| c.status == BalanceStatus::Late) {
            BalanceStatus::Late
        } else if self
            .cells
            .iter()
            .any(|c| matches!(c.status, BalanceStatus::Partial | BalanceStatus::Paid))
        {
            BalanceStatus::Partial
        } else {
            BalanceStatus::Pending
        }
    }

    pub fn cell(&self, period: PeriodRef) -> Option<&BalanceResult<ApartmentId>> {
        self.cells.iter().find(|c| c.period == period)
    }

    /// Sum of the payments applied towards the row's quotas
    pub fn applied(&self) -> BillingResult<Money> {
        Ok(Money::try_sum(self.cells.iter().map(|c| c.applied()))?)
    }

    /// Sum of the positive cell balances
    pub fn outstanding(&self) -> BillingResult<Money> {
        Ok(Money::try_sum(self.cells.iter().map(|c| c.outstanding()))?)
    }
}

/// Totals of one period across all apartments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTotal {
    pub period: PeriodRef,
    pub due_date: Option<NaiveDate>,
    pub allocated: Money,
    pub paid: Money,
    pub balance: Money,
}

/// Balances of a schedule against the payments received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGrid {
    periods: Vec<PeriodRef>,
    rows: Vec<GridRow>,
    columns: Vec<ColumnTotal>,
    unmatched_payments: Vec<Payment>,
}

impl PaymentGrid {
    /// Computes every cell of the grid as of `today`
    ///
    /// Payments for an apartment or period that is not on the schedule do not
    /// count towards any cell; they are returned in `unmatched_payments`.
    pub fn build(schedule: &QuotaSchedule, payments: &[Payment], today: NaiveDate) -> BillingResult<Self> {
        let periods = schedule.periods();
        let records = records(payments);

        let mut rows = Vec::new();
        for apartment_id in schedule.apartments() {
            let mut entries: Vec<_> = schedule.for_apartment(apartment_id).collect();
            entries.sort_by_key(|e| e.period);

            let mut cells = Vec::with_capacity(entries.len());
            for entry in entries {
                cells.push(compute_balance(
                    &apartment_id,
                    entry.period,
                    entry.amount,
                    &records,
                    Some(entry.due_date),
                    today,
                )?);
            }

            rows.push(GridRow {
                apartment_id,
                allocated: Money::try_sum(cells.iter().map(|c| c.allocated))?,
                paid: Money::try_sum(cells.iter().map(|c| c.paid))?,
                balance: Money::try_sum(cells.iter().map(|c| c.balance))?,
                cells,
            });
        }

        let mut columns = Vec::with_capacity(periods.len());
        for &period in &periods {
            let cells: Vec<_> = rows.iter().filter_map(|r| r.cell(period)).collect();
            columns.push(ColumnTotal {
                period,
                due_date: schedule.entries().iter().find(|e| e.period == period).map(|e| e.due_date),
                allocated: Money::try_sum(cells.iter().map(|c| c.allocated))?,
                paid: Money::try_sum(cells.iter().map(|c| c.paid))?,
                balance: Money::try_sum(cells.iter().map(|c| c.balance))?,
            });
        }

        let unmatched_payments: Vec<Payment> = payments
            .iter()
            .filter(|p| schedule.entry(p.apartment_id, p.period).is_none())
            .cloned()
            .collect();
        if !unmatched_payments.is_empty() {
            warn!(
                count = unmatched_payments.len(),
                "Payments do not match any scheduled quota"
            );
        }

        debug!(rows = rows.len(), periods = periods.len(), "Built payment grid");

        Ok(Self {
            periods,
            rows,
            columns,
            unmatched_payments,
        })
    }

    pub fn periods(&self) -> &[PeriodRef] {
        &self.periods
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row(&self, apartment_id: ApartmentId) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.apartment_id == apartment_id)
    }

    pub fn columns(&self) -> &[ColumnTotal] {
        &self.columns
    }

    pub fn unmatched_payments(&self) -> &[Payment] {
        &self.unmatched_payments
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = &BalanceResult<ApartmentId>> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Apartment, Building};
    use crate::payment::PaymentMethod;
    use core_kernel::BillingMonth;
    use domain_quota::WeightMode;
    use rust_decimal_macros::dec;

    fn cents(minor: i64) -> Money {
        Money::from_minor(minor).unwrap()
    }

    fn month(m: u32) -> PeriodRef {
        PeriodRef::Month(BillingMonth::new(2025, m).unwrap())
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn setup() -> (Building, QuotaSchedule) {
        let building = Building::new(
            "Edificio Sol",
            vec![Apartment::new("1A", dec!(400)), Apartment::new("1B", dec!(600))],
        )
        .unwrap();
        let schedule =
            QuotaSchedule::monthly(&building, WeightMode::Permillage, 2025, cents(10_000), 8).unwrap();
        (building, schedule)
    }

    #[test]
    fn test_cells_derive_status_from_payments() {
        let (building, schedule) = setup();
        let a = building.apartments()[0].id;
        let b = building.apartments()[1].id;
        let payments = vec![
            Payment::new(a, month(1), cents(4000), PaymentMethod::BankTransfer, date(1, 5)),
            Payment::new(b, month(1), cents(1000), PaymentMethod::Cash, date(1, 6)),
        ];

        let grid = PaymentGrid::build(&schedule, &payments, date(2, 10)).unwrap();

        assert_eq!(grid.row(a).unwrap().cell(month(1)).unwrap().status, BalanceStatus::Paid);
        assert_eq!(grid.row(b).unwrap().cell(month(1)).unwrap().status, BalanceStatus::Partial);
        assert_eq!(grid.row(a).unwrap().cell(month(2)).unwrap().status, BalanceStatus::Late);
        assert_eq!(grid.row(a).unwrap().cell(month(3)).unwrap().status, BalanceStatus::Pending);
        assert_eq!(grid.row(a).unwrap().status(), BalanceStatus::Late);
    }

    #[test]
    fn test_column_totals() {
        let (building, schedule) = setup();
        let a = building.apartments()[0].id;
        let payments = vec![Payment::new(a, month(1), cents(4000), PaymentMethod::Card, date(1, 5))];

        let grid = PaymentGrid::build(&schedule, &payments, date(1, 1)).unwrap();
        let january = grid.columns()[0];

        assert_eq!(january.period, month(1));
        assert_eq!(january.due_date, Some(date(1, 8)));
        assert_eq!(january.allocated, cents(10_000));
        assert_eq!(january.paid, cents(4000));
        assert_eq!(january.balance, cents(6000));
    }

    #[test]
    fn test_unmatched_payments_reported() {
        let (building, schedule) = setup();
        let stray = Payment::new(
            building.apartments()[0].id,
            PeriodRef::Installment(1),
            cents(500),
            PaymentMethod::Cash,
            date(1, 5),
        );
        let outsider = Payment::new(ApartmentId::new(), month(1), cents(500), PaymentMethod::Cash, date(1, 5));

        let grid = PaymentGrid::build(&schedule, &[stray.clone(), outsider.clone()], date(1, 1)).unwrap();

        assert_eq!(grid.unmatched_payments(), &[stray, outsider]);
        assert!(grid.cells().all(|c| c.paid.is_zero()));
    }

    #[test]
    fn test_row_status_all_paid() {
        let building = Building::new("Edificio Sol", vec![Apartment::new("1A", dec!(1000))]).unwrap();
        let a = building.apartments()[0].id;
        let schedule = QuotaSchedule::monthly(&building, WeightMode::Permillage, 2025, cents(100), 8).unwrap();
        let payments: Vec<Payment> = (1..=12)
            .map(|m| Payment::new(a, month(m), cents(100), PaymentMethod::DirectDebit, date(m, 1)))
            .collect();

        let grid = PaymentGrid::build(&schedule, &payments, date(12, 31)).unwrap();
        let row = grid.row(a).unwrap();

        assert_eq!(row.status(), BalanceStatus::Paid);
        assert!(row.balance.is_zero());
        assert_eq!(row.applied().unwrap(), cents(1200));
    }
}
