use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::info;

use vaultdesk::router::init_router;
use vaultdesk::state::init_app_state;
use vaultdesk_config::ServerConfig;
use vaultdesk_observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guard = init_tracing();
    let _metrics = init_metrics();

    let state = init_app_state().await;
    let cache = state.cache.clone();
    let app = init_router(state);

    let server = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(server.addr).await?;
    info!(addr = %server.addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cache.shutdown().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
