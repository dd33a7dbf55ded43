use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use vaultdesk_cache::invalidate;
use vaultdesk_core::{ApiResponse, AppError};

use crate::middleware::auth::RequireAdminRegister;
use crate::modules::admins::model::AdminProfile;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RegisterAdminDto, TokenPair,
};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip_all)]
pub async fn bootstrap_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterAdminDto>,
) -> Result<(StatusCode, Json<ApiResponse<AdminProfile>>), AppError> {
    let profile = AuthService::bootstrap_admin(&state.ledger, dto, state.password_cost).await?;
    state.cache.invalidate_all(&invalidate::admin_registered()).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Bootstrap admin created successfully", profile)),
    ))
}

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn register_admin(
    State(state): State<AppState>,
    RequireAdminRegister(admin): RequireAdminRegister,
    ValidatedJson(dto): ValidatedJson<RegisterAdminDto>,
) -> Result<(StatusCode, Json<ApiResponse<AdminProfile>>), AppError> {
    let profile = AuthService::register_admin(&state.ledger, dto, state.password_cost).await?;
    state.cache.invalidate_all(&invalidate::admin_registered()).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Admin registered successfully", profile)),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = AuthService::login(&state.ledger, dto, &state.jwt_config).await?;
    Ok(Json(ApiResponse::ok("Login successful", response)))
}

#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = AuthService::refresh(&state.ledger, &dto.refresh_token, &state.jwt_config).await?;
    Ok(Json(ApiResponse::ok("Token refreshed successfully", tokens)))
}
