use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{bootstrap_admin, login, refresh, register_admin};

/// Account creation, rate limited as critical.
pub fn init_registration_router() -> Router<AppState> {
    Router::new()
        .route("/bootstrap_admin", post(bootstrap_admin))
        .route("/register", post(register_admin))
}

pub fn init_login_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn init_refresh_router() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh))
}
