use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{approve_loan, get_loan, list_loans, reject_loan};

pub fn init_loans_read_router() -> Router<AppState> {
    Router::new()
        .route("/loans", get(list_loans))
        .route("/loans/{id}", get(get_loan))
}

pub fn init_loans_write_router() -> Router<AppState> {
    Router::new()
        .route("/loans/{id}/approve", put(approve_loan))
        .route("/loans/{id}/reject", put(reject_loan))
}
