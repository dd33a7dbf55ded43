use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{block_card, get_card, list_cards, unblock_card, update_card};

pub fn init_cards_read_router() -> Router<AppState> {
    Router::new()
        .route("/cards", get(list_cards))
        .route("/cards/{id}", get(get_card))
}

pub fn init_cards_write_router() -> Router<AppState> {
    Router::new()
        .route("/cards/{id}", put(update_card))
        .route("/cards/{id}/block", put(block_card))
        .route("/cards/{id}/unblock", put(unblock_card))
}
