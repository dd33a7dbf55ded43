use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use vaultdesk_cache::{ToQueryParams, TtlClass, invalidate, namespaces};
use vaultdesk_core::{ApiResponse, AppError, PaginatedResponse};

use crate::middleware::auth::{RequireDepositManage, RequireDepositViewAll};
use crate::modules::deposits::model::{CreateDepositDto, Deposit, DepositFilterParams};
use crate::modules::deposits::service::DepositService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip_all, fields(admin.id = admin.id, user.id = user_id))]
pub async fn list_user_deposits(
    State(state): State<AppState>,
    RequireDepositViewAll(admin): RequireDepositViewAll,
    Path(user_id): Path<i64>,
    Query(filters): Query<DepositFilterParams>,
) -> Result<Json<PaginatedResponse<Deposit>>, AppError> {
    let key = state.cache.derive_key(
        &namespaces::users::deposits(user_id),
        Some(admin.id),
        &filters.to_query_params(),
    );

    let page = state
        .cache
        .read_through(&key, TtlClass::Medium, || {
            DepositService::list_user_deposits(&state.ledger, user_id, &filters)
        })
        .await?;

    Ok(Json(page))
}

#[instrument(skip_all, fields(admin.id = admin.id, user.id = user_id))]
pub async fn create_deposit(
    State(state): State<AppState>,
    RequireDepositManage(admin): RequireDepositManage,
    Path(user_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateDepositDto>,
) -> Result<(StatusCode, Json<ApiResponse<Deposit>>), AppError> {
    let deposit = DepositService::create_deposit(&state.ledger, user_id, admin.id, dto).await?;
    state
        .cache
        .invalidate_all(&invalidate::deposit_created(user_id))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Deposit created successfully", deposit)),
    ))
}
