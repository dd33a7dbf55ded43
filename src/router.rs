use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;

use vaultdesk_config::{CorsConfig, RateLimitConfig, RateTier};
use vaultdesk_observability::{logging_middleware, metrics_middleware, render_metrics};

use crate::modules::admins::router::{
    init_admins_read_router, init_admins_write_router, init_me_read_router, init_me_write_router,
};
use crate::modules::analytics::router::init_analytics_router;
use crate::modules::auth::router::{
    init_login_router, init_refresh_router, init_registration_router,
};
use crate::modules::cards::router::{init_cards_read_router, init_cards_write_router};
use crate::modules::deposits::router::{init_deposits_read_router, init_deposits_write_router};
use crate::modules::loans::router::{init_loans_read_router, init_loans_write_router};
use crate::modules::transactions::router::{init_export_router, init_transactions_read_router};
use crate::modules::users::router::{init_users_read_router, init_users_write_router};
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let limits = &state.rate_limit_config;

    let critical = Router::new()
        .merge(init_registration_router())
        .merge(init_me_write_router())
        .merge(init_admins_write_router())
        .merge(init_users_write_router())
        .merge(init_deposits_write_router())
        .merge(init_loans_write_router())
        .merge(init_cards_write_router());

    let reads = Router::new()
        .merge(init_refresh_router())
        .merge(init_me_read_router())
        .merge(init_admins_read_router())
        .merge(init_users_read_router())
        .merge(init_deposits_read_router())
        .merge(init_loans_read_router())
        .merge(init_cards_read_router())
        .merge(init_transactions_read_router())
        .merge(init_analytics_router());

    let api = Router::new()
        .merge(rate_limited(critical, limits, RateTier::Critical))
        .merge(rate_limited(init_login_router(), limits, RateTier::Login))
        .merge(rate_limited(reads, limits, RateTier::Default))
        .merge(rate_limited(init_export_router(), limits, RateTier::Export));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api/admin", api)
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

/// Wraps `router` in the client-IP limiter for `tier`, if limiting is on.
fn rate_limited(
    router: Router<AppState>,
    limits: &RateLimitConfig,
    tier: RateTier,
) -> Router<AppState> {
    match limits.governor_config(tier) {
        Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
        None => router,
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cache": state.cache.backend(),
    }))
}

async fn metrics() -> String {
    render_metrics()
}
