use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{
    change_my_password, delete_admin, get_admin, get_me, list_admins, update_admin, update_me,
};

pub fn init_me_read_router() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Profile and password changes for the signed-in admin.
pub fn init_me_write_router() -> Router<AppState> {
    Router::new()
        .route("/me", put(update_me))
        .route("/me/password", put(change_my_password))
}

pub fn init_admins_read_router() -> Router<AppState> {
    Router::new()
        .route("/admins", get(list_admins))
        .route("/admins/{id}", get(get_admin))
}

pub fn init_admins_write_router() -> Router<AppState> {
    Router::new().route("/admins/{id}", put(update_admin).delete(delete_admin))
}
