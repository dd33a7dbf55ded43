use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_deposit, list_user_deposits};

pub fn init_deposits_read_router() -> Router<AppState> {
    Router::new().route("/users/{id}/deposits", get(list_user_deposits))
}

pub fn init_deposits_write_router() -> Router<AppState> {
    Router::new().route("/users/{id}/deposits", post(create_deposit))
}
