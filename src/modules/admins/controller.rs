use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use vaultdesk_cache::{QueryParams, ToQueryParams, TtlClass, invalidate, namespaces};
use vaultdesk_core::{ApiResponse, AppError, PaginatedResponse};

use crate::middleware::auth::{
    RequireAdminDelete, RequireAdminUpdateOther, RequireAdminUpdateSelf, RequireAdminViewAll,
    RequireAdminViewSelf,
};
use crate::modules::admins::model::{
    AdminFilterParams, AdminProfile, ChangePasswordDto, UpdateAdminDto, UpdateProfileDto,
};
use crate::modules::admins::service::AdminService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn get_me(
    State(state): State<AppState>,
    RequireAdminViewSelf(admin): RequireAdminViewSelf,
) -> Result<Json<ApiResponse<AdminProfile>>, AppError> {
    let key = state
        .cache
        .derive_key(&namespaces::admins::by_id(admin.id), None, &QueryParams::new());

    let response = state
        .cache
        .read_through(&key, TtlClass::Medium, || async {
            let profile = AdminService::get_profile(&state.ledger, admin.id).await?;
            Ok::<_, AppError>(ApiResponse::ok("Admin profile retrieved successfully", profile))
        })
        .await?;

    Ok(Json(response))
}

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireAdminUpdateSelf(admin): RequireAdminUpdateSelf,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<AdminProfile>>, AppError> {
    let profile = AdminService::update_profile(&state.ledger, admin.id, dto).await?;
    state
        .cache
        .invalidate_all(&invalidate::admin_changed(admin.id))
        .await;

    Ok(Json(ApiResponse::ok("Profile updated successfully", profile)))
}

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn change_my_password(
    State(state): State<AppState>,
    RequireAdminUpdateSelf(admin): RequireAdminUpdateSelf,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    AdminService::change_password(&state.ledger, admin.id, dto, state.password_cost).await?;
    Ok(Json(ApiResponse::ok("Password changed successfully", ())))
}

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn list_admins(
    State(state): State<AppState>,
    RequireAdminViewAll(admin): RequireAdminViewAll,
    Query(filters): Query<AdminFilterParams>,
) -> Result<Json<PaginatedResponse<AdminProfile>>, AppError> {
    let key = state.cache.derive_key(
        namespaces::admins::LIST,
        Some(admin.id),
        &filters.to_query_params(),
    );

    let page = state
        .cache
        .read_through(&key, TtlClass::Medium, || {
            AdminService::list_admins(&state.ledger, &filters)
        })
        .await?;

    Ok(Json(page))
}

#[instrument(skip_all, fields(admin.id = admin.id, target.id = id))]
pub async fn get_admin(
    State(state): State<AppState>,
    RequireAdminViewAll(admin): RequireAdminViewAll,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AdminProfile>>, AppError> {
    let key = state
        .cache
        .derive_key(&namespaces::admins::by_id(id), None, &QueryParams::new());

    let response = state
        .cache
        .read_through(&key, TtlClass::Medium, || async {
            let profile = AdminService::get_profile(&state.ledger, id).await?;
            Ok::<_, AppError>(ApiResponse::ok("Admin retrieved successfully", profile))
        })
        .await?;

    Ok(Json(response))
}

#[instrument(skip_all, fields(admin.id = admin.id, target.id = id))]
pub async fn update_admin(
    State(state): State<AppState>,
    RequireAdminUpdateOther(admin): RequireAdminUpdateOther,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateAdminDto>,
) -> Result<Json<ApiResponse<AdminProfile>>, AppError> {
    let profile = AdminService::update_admin(&state.ledger, id, dto).await?;
    state.cache.invalidate_all(&invalidate::admin_changed(id)).await;

    Ok(Json(ApiResponse::ok("Admin updated successfully", profile)))
}

#[instrument(skip_all, fields(admin.id = admin.id, target.id = id))]
pub async fn delete_admin(
    State(state): State<AppState>,
    RequireAdminDelete(admin): RequireAdminDelete,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    AdminService::delete_admin(&state.ledger, id, admin.id).await?;
    state.cache.invalidate_all(&invalidate::admin_changed(id)).await;

    Ok(Json(ApiResponse::ok("Admin deleted successfully", ())))
}
