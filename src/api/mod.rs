//! HTTP and WebSocket server for stats subscribers
//!
//! ## Endpoints
//!
//! - `WS /` - Raw event stream and `init` snapshots
//! - `WS /api/v1/stream` - Same as `/`
//! - `GET /api/v1/health` - Health check with subscriber count
//! - `GET /api/v1/stats` - Current farm stats snapshot

pub mod routes;
pub mod state;
pub mod types;
pub mod websocket;

pub use state::ApiState;
pub use types::HealthResponse;

use axum::{Router, routing::get};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:8080")
    pub bind_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

/// Build the router serving all endpoints
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(websocket::websocket_handler))
        .route("/api/v1/stream", get(websocket::websocket_handler))
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/stats", get(routes::stats::get_stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
