//! Collection statistics for the dashboard cards

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ApartmentId, Money};
use domain_quota::{BalanceResult, BalanceStatus};

use crate::error::BillingResult;
use crate::grid::PaymentGrid;
use crate::project::percent;

/// Number of cells per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub paid: usize,
    pub partial: usize,
    pub pending: usize,
    pub late: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: BalanceStatus) {
        match status {
            BalanceStatus::Paid => self.paid += 1,
            BalanceStatus::Partial => self.partial += 1,
            BalanceStatus::Pending => self.pending += 1,
            BalanceStatus::Late => self.late += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.paid + self.partial + self.pending + self.late
    }
}

/// Aggregated collection figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Sum of allocated amounts
    pub expected: Money,
    /// Payments applied, capped per cell at the amount due
    pub collected: Money,
    /// Payments beyond the amount due
    pub overpaid: Money,
    /// Sum of positive balances
    pub outstanding: Money,
    pub counts: StatusCounts,
    /// `collected / expected` as a percentage, 2 decimal places
    pub collection_rate: Decimal,
}

impl CollectionStats {
    pub fn from_grid(grid: &PaymentGrid) -> BillingResult<Self> {
        Self::from_cells(grid.cells())
    }

    pub fn from_cells<'a, I>(cells: I) -> BillingResult<Self>
    where
        I: IntoIterator<Item = &'a BalanceResult<ApartmentId>>,
    {
        let mut expected = Money::ZERO;
        let mut collected = Money::ZERO;
        let mut overpaid = Money::ZERO;
        let mut outstanding = Money::ZERO;
        let mut counts = StatusCounts::default();

        for cell in cells {
            expected = expected.checked_add(cell.allocated)?;
            collected = collected.checked_add(cell.applied())?;
            overpaid = overpaid.checked_add(cell.overpayment())?;
            outstanding = outstanding.checked_add(cell.outstanding())?;
            counts.record(cell.status);
        }

        Ok(Self {
            expected,
            collected,
            overpaid,
            outstanding,
            counts,
            collection_rate: percent(collected, expected),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{BillingMonth, PeriodRef};
    use rust_decimal_macros::dec;

    fn cell(allocated: i64, paid: i64, status: BalanceStatus) -> BalanceResult<ApartmentId> {
        BalanceResult {
            participant_id: ApartmentId::new(),
            period: PeriodRef::Month(BillingMonth::new(2025, 1).unwrap()),
            allocated: Money::from_minor(allocated).unwrap(),
            paid: Money::from_minor(paid).unwrap(),
            balance: Money::from_minor(allocated - paid).unwrap(),
            status,
        }
    }

    #[test]
    fn test_stats_from_cells() {
        let cells = vec![
            cell(5000, 5000, BalanceStatus::Paid),
            cell(5000, 6000, BalanceStatus::Paid),
            cell(3000, 1000, BalanceStatus::Partial),
            cell(2000, 0, BalanceStatus::Late),
        ];

        let stats = CollectionStats::from_cells(&cells).unwrap();

        assert_eq!(stats.expected.minor(), 15_000);
        assert_eq!(stats.collected.minor(), 11_000);
        assert_eq!(stats.overpaid.minor(), 1000);
        assert_eq!(stats.outstanding.minor(), 4000);
        assert_eq!(stats.counts.paid, 2);
        assert_eq!(stats.counts.total(), 4);
        assert_eq!(stats.collection_rate, dec!(73.33));
    }

    #[test]
    fn test_nothing_expected() {
        let cells: Vec<BalanceResult<ApartmentId>> = Vec::new();
        let stats = CollectionStats::from_cells(&cells).unwrap();
        assert_eq!(stats.collection_rate, Decimal::ZERO);
        assert_eq!(stats.counts.total(), 0);
    }
}
