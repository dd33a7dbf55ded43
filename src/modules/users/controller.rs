use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use vaultdesk_cache::{QueryParams, ToQueryParams, TtlClass, invalidate, namespaces};
use vaultdesk_core::{ApiResponse, AppError, PaginatedResponse};

use crate::middleware::auth::{
    RequireUserApprove, RequireUserDelete, RequireUserUpdate, RequireUserViewAll,
};
use crate::modules::users::model::{UpdateUserDto, User, UserFilterParams};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn list_users(
    State(state): State<AppState>,
    RequireUserViewAll(admin): RequireUserViewAll,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<PaginatedResponse<User>>, AppError> {
    let key = state.cache.derive_key(
        namespaces::users::LIST,
        Some(admin.id),
        &filters.to_query_params(),
    );

    let page = state
        .cache
        .read_through(&key, TtlClass::Short, || {
            UserService::list_users(&state.ledger, &filters)
        })
        .await?;

    Ok(Json(page))
}

#[instrument(skip_all, fields(admin.id = admin.id, user.id = id))]
pub async fn get_user(
    State(state): State<AppState>,
    RequireUserViewAll(admin): RequireUserViewAll,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let key = state
        .cache
        .derive_key(&namespaces::users::by_id(id), None, &QueryParams::new());

    let response = state
        .cache
        .read_through(&key, TtlClass::Medium, || async {
            let user = UserService::get_user(&state.ledger, id).await?;
            Ok::<_, AppError>(ApiResponse::ok("User retrieved successfully", user))
        })
        .await?;

    Ok(Json(response))
}

#[instrument(skip_all, fields(admin.id = admin.id, user.id = id))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireUserUpdate(admin): RequireUserUpdate,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = UserService::update_user(&state.ledger, id, dto).await?;
    state.cache.invalidate_all(&invalidate::user_changed(id)).await;

    Ok(Json(ApiResponse::ok("User updated successfully", user)))
}

#[instrument(skip_all, fields(admin.id = admin.id, user.id = id))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUserDelete(admin): RequireUserDelete,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    UserService::delete_user(&state.ledger, id).await?;
    state.cache.invalidate_all(&invalidate::user_deleted(id)).await;

    Ok(Json(ApiResponse::ok("User deleted successfully", ())))
}

#[instrument(skip_all, fields(admin.id = admin.id, user.id = id))]
pub async fn toggle_user_status(
    State(state): State<AppState>,
    RequireUserApprove(admin): RequireUserApprove,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = UserService::toggle_status(&state.ledger, id).await?;
    state.cache.invalidate_all(&invalidate::user_changed(id)).await;

    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(Json(ApiResponse::ok(message, user)))
}
