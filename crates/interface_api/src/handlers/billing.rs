//! Billing handlers: project progress and the quota grid

use axum::{extract::State, Json};
use chrono::Utc;
use core_kernel::{ApartmentId, BillingMonth, Currency, Money, PeriodRef};
use domain_billing::{
    Building, CollectionStats, ExtraordinaryProject, Payment, PaymentGrid, QuotaSchedule,
};
use domain_quota::checked_installment_count;
use tracing::debug;

use crate::dto::billing::*;
use crate::dto::AmountView;
use crate::{error::ApiError, AppState};

fn apartment_id(building: &Building, label: &str) -> Result<ApartmentId, ApiError> {
    building
        .apartment_by_label(label)
        .map(|a| a.id)
        .ok_or_else(|| ApiError::Validation(format!("Unknown apartment: {}", label)))
}

fn label(building: &Building, id: ApartmentId) -> String {
    building
        .apartment(id)
        .map(|a| a.label.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Collection progress of an extraordinary project
pub async fn project_summary(
    State(state): State<AppState>,
    Json(request): Json<ProjectSummaryRequest>,
) -> Result<Json<ProjectSummaryResponse>, ApiError> {
    let currency = state.config.currency;
    let building = request.building.to_building()?;
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());

    let input = &request.project;
    let project = ExtraordinaryProject::new(
        building.id(),
        input.name.clone(),
        Money::from_minor(input.budget_cents)?,
        checked_installment_count(input.installments)?,
        input.start_date,
        input.mode,
    );

    let payments = request
        .payments
        .iter()
        .map(|p| {
            Ok(Payment::new(
                apartment_id(&building, &p.apartment)?,
                PeriodRef::Installment(p.installment),
                Money::from_minor(p.amount_cents)?,
                p.method,
                p.paid_on,
            ))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let summary = project.summary(&building, &payments, today)?;
    debug!(project = %project.name, progress = %summary.progress_percent, "Computed project summary");

    let view = |m: Money| AmountView::new(m, currency);
    Ok(Json(ProjectSummaryResponse {
        project: project.name.clone(),
        budget: view(summary.budget),
        collected: view(summary.collected),
        outstanding: view(summary.outstanding),
        progress_percent: summary.progress_percent,
        installments_due: summary.installments_due,
        apartments: summary
            .apartments
            .into_iter()
            .map(|a| ApartmentProgressView {
                apartment: a.label,
                share: view(a.share),
                paid: view(a.paid),
                balance: view(a.balance),
                status: a.status,
            })
            .collect(),
    }))
}

/// Payment grid and collection stats of a year of monthly quotas
pub async fn quota_grid(
    State(state): State<AppState>,
    Json(request): Json<QuotaGridRequest>,
) -> Result<Json<QuotaGridResponse>, ApiError> {
    let currency = state.config.currency;
    let building = request.building.to_building()?;
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
    let due_day = request.due_day.unwrap_or(state.config.default_due_day);
    let total = Money::from_minor(request.total_cents)?;

    let schedule = match request.kind {
        ScheduleKind::Monthly => QuotaSchedule::monthly(&building, request.mode, request.year, total, due_day)?,
        ScheduleKind::AnnualBudget => {
            QuotaSchedule::from_annual_budget(&building, request.mode, request.year, total, due_day)?
        }
    };

    let payments = request
        .payments
        .iter()
        .map(|p| {
            Ok(Payment::new(
                apartment_id(&building, &p.apartment)?,
                PeriodRef::Month(BillingMonth::new(request.year, p.month)?),
                Money::from_minor(p.amount_cents)?,
                p.method,
                p.paid_on,
            ))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let grid = PaymentGrid::build(&schedule, &payments, today)?;
    let stats = CollectionStats::from_grid(&grid)?;

    Ok(Json(grid_response(&building, &grid, &stats, currency)))
}

fn grid_response(
    building: &Building,
    grid: &PaymentGrid,
    stats: &CollectionStats,
    currency: Currency,
) -> QuotaGridResponse {
    let view = |m: Money| AmountView::new(m, currency);

    QuotaGridResponse {
        periods: grid.periods().iter().map(|p| p.to_string()).collect(),
        rows: grid
            .rows()
            .iter()
            .map(|row| GridRowView {
                apartment: label(building, row.apartment_id),
                cells: row
                    .cells
                    .iter()
                    .map(|cell| GridCellView {
                        period: cell.period.to_string(),
                        allocated: view(cell.allocated),
                        paid: view(cell.paid),
                        balance: view(cell.balance),
                        status: cell.status,
                    })
                    .collect(),
                allocated: view(row.allocated),
                paid: view(row.paid),
                balance: view(row.balance),
                status: row.status(),
            })
            .collect(),
        columns: grid
            .columns()
            .iter()
            .map(|column| ColumnView {
                period: column.period.to_string(),
                due_date: column.due_date,
                allocated: view(column.allocated),
                paid: view(column.paid),
                balance: view(column.balance),
            })
            .collect(),
        unmatched_payments: grid.unmatched_payments().len(),
        stats: StatsView {
            expected: view(stats.expected),
            collected: view(stats.collected),
            overpaid: view(stats.overpaid),
            outstanding: view(stats.outstanding),
            counts: stats.counts,
            collection_rate: stats.collection_rate,
        },
    }
}
