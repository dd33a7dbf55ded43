//! Tracing subscriber setup and per-request logging.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: full filter directive, takes precedence
//! - `LOG_LEVEL`: level for the Vaultdesk crates when `RUST_LOG` is unset (default: `info`)
//! - `LOG_DIR`: when set, structured JSON logs are also written there, rotated daily

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Response header carrying the id logged for the request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn default_filter(level: &str) -> String {
    format!(
        "vaultdesk={level},vaultdesk_cache={level},vaultdesk_auth={level},vaultdesk_config={level},tower_http=warn,hyper=warn,redis=warn"
    )
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(default_filter(&level))
    })
}

/// Installs the global subscriber.
///
/// Returns the file writer guard when `LOG_DIR` is set. Keep it alive for the
/// life of the process or buffered lines are lost on exit.
pub fn init_tracing() -> Option<WorkerGuard> {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter());

    let log_dir = std::env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty());

    match log_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(&dir) {
                eprintln!("Failed to create log directory {dir}: {e}. Logging to console only");
                tracing_subscriber::registry().with(console_layer).init();
                return None;
            }

            let appender = RollingFileAppender::new(Rotation::DAILY, &dir, "vaultdesk.json");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let json_layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(env_filter());

            tracing_subscriber::registry()
                .with(console_layer)
                .with(json_layer)
                .init();

            info!(log_dir = %dir, "Tracing initialized with JSON file logging");
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(console_layer).init();
            None
        }
    }
}

/// Logs every request with a generated id, the matched route, status and latency.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request_id = uuid::Uuid::new_v4().to_string();

    let mut response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(%request_id, %method, %path, status, latency_ms, "Server error"),
        400..=499 => warn!(%request_id, %method, %path, status, latency_ms, "Client error"),
        _ => info!(%request_id, %method, %path, status, latency_ms, "Request completed"),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
