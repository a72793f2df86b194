//! Health gateway: `GET /` liveness and `GET /status` JSON.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::observability::RelayEvent;
use crate::relay::{RelayStats, RelayStatsSnapshot};

/// Bot name reported by `/status`.
pub const STATUS_BOT_NAME: &str = "Telegram Affiliate Bot";

/// Shared state for the health server.
#[derive(Clone)]
pub struct GatewayState {
    /// Counters published by `/status`.
    pub stats: Arc<RelayStats>,
}

/// Response body for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always `running` while the server answers.
    pub status: &'static str,
    /// RFC 3339 UTC timestamp of the response.
    pub timestamp: String,
    /// [`STATUS_BOT_NAME`].
    pub bot: &'static str,
    /// Relay counters, flattened into the top-level object.
    #[serde(flatten)]
    pub counters: RelayStatsSnapshot,
}

async fn handle_root() -> &'static str {
    "OK"
}

async fn handle_status(State(state): State<GatewayState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        timestamp: chrono::Utc::now().to_rfc3339(),
        bot: STATUS_BOT_NAME,
        counters: state.stats.snapshot(),
    })
}

/// Build the health router.
pub fn router(stats: Arc<RelayStats>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/status", get(handle_status))
        .with_state(GatewayState { stats })
}

/// Serve the health router on `bind_addr` until `shutdown` resolves.
pub async fn run_http<F>(bind_addr: &str, stats: Arc<RelayStats>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind health server on {bind_addr}"))?;
    tracing::info!(
        event = RelayEvent::GatewayListening.as_str(),
        bind_addr,
        "health server listening"
    );
    axum::serve(listener, router(stats))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("health server stopped");
    Ok(())
}
