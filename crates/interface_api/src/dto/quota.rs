//! Apportionment engine DTOs

use chrono::NaiveDate;
use domain_quota::{BalanceStatus, Participant, WeightMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AmountView;

/// A participant as sent by clients; ids are opaque strings
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantInput {
    pub id: String,
    pub weight: Decimal,
}

impl ParticipantInput {
    pub fn to_participant(&self) -> Participant<String> {
        Participant::new(self.id.clone(), self.weight)
    }
}

pub fn participants(inputs: &[ParticipantInput]) -> Vec<Participant<String>> {
    inputs.iter().map(ParticipantInput::to_participant).collect()
}

fn default_installments() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct InstallmentsRequest {
    pub total_cents: i64,
    pub installments: i64,
}

#[derive(Debug, Serialize)]
pub struct InstallmentView {
    pub index: u32,
    pub amount: AmountView,
}

#[derive(Debug, Serialize)]
pub struct InstallmentsResponse {
    pub total: AmountView,
    pub installments: Vec<InstallmentView>,
}

#[derive(Debug, Deserialize)]
pub struct WeightsRequest {
    pub participants: Vec<ParticipantInput>,
    pub mode: WeightMode,
}

#[derive(Debug, Serialize)]
pub struct NormalizedShareView {
    pub id: String,
    pub share: Decimal,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub shares: Vec<NormalizedShareView>,
}

#[derive(Debug, Serialize)]
pub struct PermillageView {
    pub id: String,
    pub permillage: u32,
}

#[derive(Debug, Serialize)]
pub struct PermillageResponse {
    pub shares: Vec<PermillageView>,
}

#[derive(Debug, Deserialize)]
pub struct AllocationRequest {
    pub total_cents: i64,
    pub participants: Vec<ParticipantInput>,
    pub mode: WeightMode,
}

#[derive(Debug, Serialize)]
pub struct AllocationView {
    pub id: String,
    pub amount: AmountView,
}

#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub total: AmountView,
    pub allocations: Vec<AllocationView>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    pub allocated_cents: i64,
    pub paid_cents: i64,
    pub due_date: Option<NaiveDate>,
    /// Defaults to the server's current date
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub allocated: AmountView,
    pub paid: AmountView,
    /// Signed balance; negative when overpaid
    pub balance: AmountView,
    /// Balance floored at zero
    pub display_balance: AmountView,
    pub status: BalanceStatus,
}

#[derive(Debug, Deserialize)]
pub struct ApportionRequest {
    pub total_cents: i64,
    pub participants: Vec<ParticipantInput>,
    pub mode: WeightMode,
    #[serde(default = "default_installments")]
    pub installments: i64,
}

#[derive(Debug, Serialize)]
pub struct ParticipantScheduleView {
    pub id: String,
    pub share: AmountView,
    pub installments: Vec<InstallmentView>,
}

#[derive(Debug, Serialize)]
pub struct ApportionResponse {
    pub total: AmountView,
    pub installment_count: u32,
    pub shares: Vec<ParticipantScheduleView>,
    /// Amount due across all participants per installment
    pub installment_totals: Vec<AmountView>,
}
