//! Extraordinary projects
//!
//! A one-off expense (roof repair, elevator replacement) apportioned across
//! the building and paid in monthly installments from a start date.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{installment_due_date, ApartmentId, BuildingId, Money, PeriodRef, ProjectId};
use domain_quota::{BalanceStatus, WeightMode};

use crate::building::Building;
use crate::error::{BillingError, BillingResult};
use crate::grid::PaymentGrid;
use crate::payment::Payment;
use crate::schedule::{QuotaSchedule, ScheduledQuota};

/// An extraordinary charge voted by the condominium
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraordinaryProject {
    pub id: ProjectId,
    pub building_id: BuildingId,
    pub name: String,
    pub budget: Money,
    pub installments: u32,
    /// Due date of the first installment
    pub start_date: NaiveDate,
    pub mode: WeightMode,
}

impl ExtraordinaryProject {
    pub fn new(
        building_id: BuildingId,
        name: impl Into<String>,
        budget: Money,
        installments: u32,
        start_date: NaiveDate,
        mode: WeightMode,
    ) -> Self {
        Self {
            id: ProjectId::new_v7(),
            building_id,
            name: name.into(),
            budget,
            installments,
            start_date,
            mode,
        }
    }

    pub fn with_id(mut self, id: ProjectId) -> Self {
        self.id = id;
        self
    }

    /// Installment schedule of every apartment
    ///
    /// Installment `i` is due `i - 1` months after the start date.
    pub fn plan(&self, building: &Building) -> BillingResult<QuotaSchedule> {
        if building.id() != self.building_id {
            return Err(BillingError::BuildingMismatch {
                expected: self.building_id,
                actual: building.id(),
            });
        }

        let apportionment = building
            .charge(self.budget, self.mode)
            .with_installments(self.installments)
            .apportion()?;

        let due_dates = (1..=self.installments)
            .map(|index| installment_due_date(self.start_date, index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::new();
        for share in &apportionment.shares {
            for (installment, due_date) in share.installments.iter().zip(&due_dates) {
                entries.push(ScheduledQuota {
                    apartment_id: share.participant_id,
                    period: PeriodRef::Installment(installment.index),
                    due_date: *due_date,
                    amount: installment.amount,
                });
            }
        }

        info!(
            project_id = %self.id,
            budget = self.budget.minor(),
            installments = self.installments,
            "Planned extraordinary project"
        );

        Ok(QuotaSchedule::new(entries))
    }

    /// Collection progress of the project as of `today`
    pub fn summary(&self, building: &Building, payments: &[Payment], today: NaiveDate) -> BillingResult<ProjectSummary> {
        let schedule = self.plan(building)?;
        let grid = PaymentGrid::build(&schedule, payments, today)?;

        let mut apartments = Vec::with_capacity(grid.rows().len());
        for row in grid.rows() {
            apartments.push(ApartmentProgress {
                apartment_id: row.apartment_id,
                label: building
                    .apartment(row.apartment_id)
                    .map(|a| a.label.clone())
                    .unwrap_or_default(),
                share: row.allocated,
                paid: row.paid,
                balance: row.balance,
                status: row.status(),
            });
        }

        let collected = Money::try_sum(grid.cells().map(|c| c.applied()))?;
        let outstanding = Money::try_sum(grid.cells().map(|c| c.outstanding()))?;
        let installments_due = (1..=self.installments)
            .filter(|index| {
                installment_due_date(self.start_date, *index).is_ok_and(|due| due <= today)
            })
            .count() as u32;

        Ok(ProjectSummary {
            project_id: self.id,
            budget: self.budget,
            collected,
            outstanding,
            progress_percent: percent(collected, self.budget),
            installments_due,
            apartments,
        })
    }
}

/// An apartment's standing in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApartmentProgress {
    pub apartment_id: ApartmentId,
    pub label: String,
    pub share: Money,
    pub paid: Money,
    pub balance: Money,
    pub status: BalanceStatus,
}

/// Collection progress of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: ProjectId,
    pub budget: Money,
    /// Payments applied to installments, each capped at the amount due
    pub collected: Money,
    pub outstanding: Money,
    /// `collected / budget` as a percentage, 2 decimal places
    pub progress_percent: Decimal,
    /// Installments whose due date is today or earlier
    pub installments_due: u32,
    pub apartments: Vec<ApartmentProgress>,
}

/// `part / whole` as a percentage rounded half away from zero; 0 for an empty whole
pub(crate) fn percent(part: Money, whole: Money) -> Decimal {
    if !whole.is_positive() {
        return Decimal::ZERO;
    }
    (Decimal::from(part.minor()) * Decimal::ONE_HUNDRED / Decimal::from(whole.minor()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
