use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{delete_user, get_user, list_users, toggle_user_status, update_user};

pub fn init_users_read_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
}

pub fn init_users_write_router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}", put(update_user).delete(delete_user))
        .route("/users/toggle_user_status/{id}", put(toggle_user_status))
}
