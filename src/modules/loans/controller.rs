use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use vaultdesk_cache::{QueryParams, ToQueryParams, TtlClass, invalidate, namespaces};
use vaultdesk_core::{ApiResponse, AppError, PaginatedResponse};

use crate::middleware::auth::{RequireLoanApprove, RequireLoanViewAll};
use crate::modules::loans::model::{Loan, LoanFilterParams};
use crate::modules::loans::service::LoanService;
use crate::state::AppState;

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn list_loans(
    State(state): State<AppState>,
    RequireLoanViewAll(admin): RequireLoanViewAll,
    Query(filters): Query<LoanFilterParams>,
) -> Result<Json<PaginatedResponse<Loan>>, AppError> {
    let key = state.cache.derive_key(
        namespaces::loans::LIST,
        Some(admin.id),
        &filters.to_query_params(),
    );

    let page = state
        .cache
        .read_through(&key, TtlClass::Short, || {
            LoanService::list_loans(&state.ledger, &filters)
        })
        .await?;

    Ok(Json(page))
}

#[instrument(skip_all, fields(admin.id = admin.id, loan.id = id))]
pub async fn get_loan(
    State(state): State<AppState>,
    RequireLoanViewAll(admin): RequireLoanViewAll,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Loan>>, AppError> {
    let key = state
        .cache
        .derive_key(&namespaces::loans::by_id(id), None, &QueryParams::new());

    let response = state
        .cache
        .read_through(&key, TtlClass::Medium, || async {
            let loan = LoanService::get_loan(&state.ledger, id).await?;
            Ok::<_, AppError>(ApiResponse::ok("Loan retrieved successfully", loan))
        })
        .await?;

    Ok(Json(response))
}

#[instrument(skip_all, fields(admin.id = admin.id, loan.id = id))]
pub async fn approve_loan(
    State(state): State<AppState>,
    RequireLoanApprove(admin): RequireLoanApprove,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Loan>>, AppError> {
    let loan = LoanService::approve_loan(&state.ledger, id, admin.id).await?;

    // Approval credits the borrower, so their cached balance goes too.
    let mut plan = invalidate::loan_decided(id);
    plan.extend(invalidate::user_changed(loan.user_id));
    state.cache.invalidate_all(&plan).await;

    Ok(Json(ApiResponse::ok("Loan approved successfully", loan)))
}

#[instrument(skip_all, fields(admin.id = admin.id, loan.id = id))]
pub async fn reject_loan(
    State(state): State<AppState>,
    RequireLoanApprove(admin): RequireLoanApprove,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Loan>>, AppError> {
    let loan = LoanService::reject_loan(&state.ledger, id, admin.id).await?;
    state.cache.invalidate_all(&invalidate::loan_decided(id)).await;

    Ok(Json(ApiResponse::ok("Loan rejected successfully", loan)))
}
