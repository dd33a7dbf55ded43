use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use vaultdesk_cache::{QueryParams, ToQueryParams, TtlClass, invalidate, namespaces};
use vaultdesk_core::{ApiResponse, AppError, PaginatedResponse};

use crate::middleware::auth::{RequireCardManage, RequireCardViewAll};
use crate::modules::cards::model::{CardFilterParams, CardStatus, CardView, UpdateCardDto};
use crate::modules::cards::service::CardService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn list_cards(
    State(state): State<AppState>,
    RequireCardViewAll(admin): RequireCardViewAll,
    Query(filters): Query<CardFilterParams>,
) -> Result<Json<PaginatedResponse<CardView>>, AppError> {
    let key = state.cache.derive_key(
        namespaces::cards::LIST,
        Some(admin.id),
        &filters.to_query_params(),
    );

    let page = state
        .cache
        .read_through(&key, TtlClass::Medium, || {
            CardService::list_cards(&state.ledger, &filters)
        })
        .await?;

    Ok(Json(page))
}

#[instrument(skip_all, fields(admin.id = admin.id, card.id = id))]
pub async fn get_card(
    State(state): State<AppState>,
    RequireCardViewAll(admin): RequireCardViewAll,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CardView>>, AppError> {
    let key = state
        .cache
        .derive_key(&namespaces::cards::by_id(id), None, &QueryParams::new());

    let response = state
        .cache
        .read_through(&key, TtlClass::Medium, || async {
            let card = CardService::get_card(&state.ledger, id).await?;
            Ok::<_, AppError>(ApiResponse::ok("Card retrieved successfully", card))
        })
        .await?;

    Ok(Json(response))
}

#[instrument(skip_all, fields(admin.id = admin.id, card.id = id))]
pub async fn block_card(
    State(state): State<AppState>,
    RequireCardManage(admin): RequireCardManage,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CardView>>, AppError> {
    let card = CardService::set_status(&state.ledger, id, CardStatus::Blocked).await?;
    state.cache.invalidate_all(&invalidate::card_changed(id)).await;

    Ok(Json(ApiResponse::ok("Card blocked successfully", card)))
}

#[instrument(skip_all, fields(admin.id = admin.id, card.id = id))]
pub async fn unblock_card(
    State(state): State<AppState>,
    RequireCardManage(admin): RequireCardManage,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CardView>>, AppError> {
    let card = CardService::set_status(&state.ledger, id, CardStatus::Active).await?;
    state.cache.invalidate_all(&invalidate::card_changed(id)).await;

    Ok(Json(ApiResponse::ok("Card unblocked successfully", card)))
}

#[instrument(skip_all, fields(admin.id = admin.id, card.id = id))]
pub async fn update_card(
    State(state): State<AppState>,
    RequireCardManage(admin): RequireCardManage,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCardDto>,
) -> Result<Json<ApiResponse<CardView>>, AppError> {
    let card = CardService::update_card(&state.ledger, id, dto, state.password_cost).await?;
    state.cache.invalidate_all(&invalidate::card_changed(id)).await;

    Ok(Json(ApiResponse::ok("Card updated successfully", card)))
}
