pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(|| async { "ok" }))
        // Option chains
        .route("/api/option-chain/{symbol}", get(handlers::chain::option_chain))
        .route("/api/download/{symbol}", get(handlers::chain::download_csv))
        .route("/api/batch", post(handlers::batch::batch))
        // Watchlist
        .route("/api/stocks", get(handlers::stocks::list))
        .route("/api/add-stock", post(handlers::stocks::add))
        .route("/api/remove-stock", post(handlers::stocks::remove))
        .route("/api/search/{query}", get(handlers::stocks::search))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::new(config);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    info!(%addr, upstream = %config.upstream.base_url, "option chain proxy listening");
    info!("  Chain:    GET  http://{addr}/api/option-chain/{{symbol}}?expiry=");
    info!("  Batch:    POST http://{addr}/api/batch?concurrency=");
    info!("  Download: GET  http://{addr}/api/download/{{symbol}}?expiry=");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
