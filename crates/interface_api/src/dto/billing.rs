//! Billing DTOs

use chrono::NaiveDate;
use domain_billing::{Apartment, BillingResult, Building, PaymentMethod, StatusCounts};
use domain_quota::{BalanceStatus, WeightMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AmountView;

#[derive(Debug, Deserialize)]
pub struct ApartmentInput {
    pub label: String,
    pub permillage: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BuildingInput {
    pub name: String,
    pub apartments: Vec<ApartmentInput>,
}

impl BuildingInput {
    pub fn to_building(&self) -> BillingResult<Building> {
        Building::new(
            self.name.clone(),
            self.apartments
                .iter()
                .map(|a| Apartment::new(a.label.clone(), a.permillage))
                .collect(),
        )
    }
}

fn default_method() -> PaymentMethod {
    PaymentMethod::BankTransfer
}

#[derive(Debug, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    pub budget_cents: i64,
    pub installments: i64,
    pub start_date: NaiveDate,
    pub mode: WeightMode,
}

/// A payment towards one project installment; apartments are named by label
#[derive(Debug, Deserialize)]
pub struct ProjectPaymentInput {
    pub apartment: String,
    pub installment: u32,
    pub amount_cents: i64,
    #[serde(default = "default_method")]
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSummaryRequest {
    pub building: BuildingInput,
    pub project: ProjectInput,
    #[serde(default)]
    pub payments: Vec<ProjectPaymentInput>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ApartmentProgressView {
    pub apartment: String,
    pub share: AmountView,
    pub paid: AmountView,
    pub balance: AmountView,
    pub status: BalanceStatus,
}

#[derive(Debug, Serialize)]
pub struct ProjectSummaryResponse {
    pub project: String,
    pub budget: AmountView,
    pub collected: AmountView,
    pub outstanding: AmountView,
    pub progress_percent: Decimal,
    pub installments_due: u32,
    pub apartments: Vec<ApartmentProgressView>,
}

/// How the request total becomes monthly quotas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// The total is charged every month
    Monthly,
    /// The total is a yearly budget paid in twelve installments
    AnnualBudget,
}

/// A payment towards one monthly quota of the requested year
#[derive(Debug, Deserialize)]
pub struct MonthlyPaymentInput {
    pub apartment: String,
    pub month: u32,
    pub amount_cents: i64,
    #[serde(default = "default_method")]
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct QuotaGridRequest {
    pub building: BuildingInput,
    pub year: i32,
    pub kind: ScheduleKind,
    pub mode: WeightMode,
    pub total_cents: i64,
    /// Defaults to the configured due day
    pub due_day: Option<u32>,
    #[serde(default)]
    pub payments: Vec<MonthlyPaymentInput>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct GridCellView {
    pub period: String,
    pub allocated: AmountView,
    pub paid: AmountView,
    pub balance: AmountView,
    pub status: BalanceStatus,
}

#[derive(Debug, Serialize)]
pub struct GridRowView {
    pub apartment: String,
    pub cells: Vec<GridCellView>,
    pub allocated: AmountView,
    pub paid: AmountView,
    pub balance: AmountView,
    pub status: BalanceStatus,
}

#[derive(Debug, Serialize)]
pub struct ColumnView {
    pub period: String,
    pub due_date: Option<NaiveDate>,
    pub allocated: AmountView,
    pub paid: AmountView,
    pub balance: AmountView,
}

#[derive(Debug, Serialize)]
pub struct StatsView {
    pub expected: AmountView,
    pub collected: AmountView,
    pub overpaid: AmountView,
    pub outstanding: AmountView,
    pub counts: StatusCounts,
    pub collection_rate: Decimal,
}

#[derive(Debug, Serialize)]
pub struct QuotaGridResponse {
    pub periods: Vec<String>,
    pub rows: Vec<GridRowView>,
    pub columns: Vec<ColumnView>,
    /// Payments that match no scheduled quota
    pub unmatched_payments: usize,
    pub stats: StatsView,
}
