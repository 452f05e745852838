//! Apportionment engine handlers
//!
//! Thin translations between JSON and the engine; all arithmetic and
//! validation happens in `domain_quota`.

use axum::{extract::State, Json};
use chrono::Utc;
use core_kernel::{Currency, Money};
use domain_quota::{
    allocate_with_mode, assess_balance, checked_installment_count, normalize,
    normalize_to_permillage, Charge, Installment,
};

use crate::dto::quota::*;
use crate::dto::AmountView;
use crate::{error::ApiError, AppState};

fn installment_views(installments: &[Installment], currency: Currency) -> Vec<InstallmentView> {
    installments
        .iter()
        .map(|i| InstallmentView {
            index: i.index,
            amount: AmountView::new(i.amount, currency),
        })
        .collect()
}

/// Splits a total into installments
pub async fn split_installments(
    State(state): State<AppState>,
    Json(request): Json<InstallmentsRequest>,
) -> Result<Json<InstallmentsResponse>, ApiError> {
    let currency = state.config.currency;
    let count = checked_installment_count(request.installments)?;
    let total = Money::from_minor(request.total_cents)?;
    let installments = Installment::schedule(total, count)?;

    Ok(Json(InstallmentsResponse {
        total: AmountView::new(total, currency),
        installments: installment_views(&installments, currency),
    }))
}

/// Normalizes weights into fractions of their sum
pub async fn normalize_weights(
    Json(request): Json<WeightsRequest>,
) -> Result<Json<NormalizeResponse>, ApiError> {
    let shares = normalize(&participants(&request.participants), request.mode)?;

    Ok(Json(NormalizeResponse {
        shares: shares
            .into_iter()
            .map(|s| NormalizedShareView { id: s.id, share: s.share })
            .collect(),
    }))
}

/// Normalizes weights into integer permillages summing to 1000
pub async fn permillage(
    Json(request): Json<WeightsRequest>,
) -> Result<Json<PermillageResponse>, ApiError> {
    let shares = normalize_to_permillage(&participants(&request.participants), request.mode)?;

    Ok(Json(PermillageResponse {
        shares: shares
            .into_iter()
            .map(|s| PermillageView { id: s.id, permillage: s.permillage })
            .collect(),
    }))
}

/// Apportions a total across weighted participants
pub async fn allocate(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<AllocationResponse>, ApiError> {
    let currency = state.config.currency;
    let total = Money::from_minor(request.total_cents)?;
    let allocations = allocate_with_mode(total, &participants(&request.participants), request.mode)?;

    Ok(Json(AllocationResponse {
        total: AmountView::new(total, currency),
        allocations: allocations
            .into_iter()
            .map(|a| AllocationView {
                id: a.participant_id,
                amount: AmountView::new(a.amount, currency),
            })
            .collect(),
    }))
}

/// Derives balance and status of one allocated amount
pub async fn balance(
    State(state): State<AppState>,
    Json(request): Json<BalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let currency = state.config.currency;
    let allocated = Money::from_minor(request.allocated_cents)?;
    let paid = Money::from_minor(request.paid_cents)?;
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());

    let summary = assess_balance(allocated, paid, request.due_date, today)?;

    Ok(Json(BalanceResponse {
        allocated: AmountView::new(allocated, currency),
        paid: AmountView::new(paid, currency),
        balance: AmountView::new(summary.balance, currency),
        display_balance: AmountView::new(summary.balance.non_negative(), currency),
        status: summary.status,
    }))
}

/// Allocates a charge and splits every share into installments
pub async fn apportion_charge(
    State(state): State<AppState>,
    Json(request): Json<ApportionRequest>,
) -> Result<Json<ApportionResponse>, ApiError> {
    let currency = state.config.currency;
    let count = checked_installment_count(request.installments)?;
    let total = Money::from_minor(request.total_cents)?;

    let apportionment = Charge::new(total, participants(&request.participants), request.mode)
        .with_installments(count)
        .apportion()?;
    let installment_totals = apportionment
        .installment_totals()?
        .into_iter()
        .map(|m| AmountView::new(m, currency))
        .collect();

    Ok(Json(ApportionResponse {
        total: AmountView::new(apportionment.total, currency),
        installment_count: apportionment.installment_count,
        shares: apportionment
            .shares
            .into_iter()
            .map(|s| ParticipantScheduleView {
                share: AmountView::new(s.share, currency),
                installments: installment_views(&s.installments, currency),
                id: s.participant_id,
            })
            .collect(),
        installment_totals,
    }))
}
