use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{export_transactions, get_transaction, list_transactions};

pub fn init_transactions_read_router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions/details/{id}", get(get_transaction))
}

pub fn init_export_router() -> Router<AppState> {
    Router::new().route("/transactions/export", get(export_transactions))
}
