use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_summary;

pub fn init_analytics_router() -> Router<AppState> {
    Router::new().route("/analytics/summary", get(get_summary))
}
