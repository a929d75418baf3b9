//! `api` crate — HTTP surface for registered actions.
//!
//! Exposes:
//!   GET    /health
//!   GET    /actions
//!   POST   /actions/{name}      one route per registered action
//!   GET    /compute?n=42        CPU-bound demo, off the async workers
//!
//! Routes are generated once from a frozen [`NodeRegistry`]; actions
//! registered afterwards are not published.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use nodes::NodeRegistry;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use handlers::AppState;

/// Path prefix under which every action is published.
pub const ACTIONS_PREFIX: &str = "/actions";

/// Build the full application router.
pub fn router(registry: Arc<NodeRegistry>) -> Router {
    let state = AppState { registry };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest(ACTIONS_PREFIX, handlers::actions::router(state.clone()))
        .route("/compute", get(handlers::compute::compute))
        .route("/health", get(handlers::health::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, registry: Arc<NodeRegistry>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    info!(addr = %local, actions = registry.len(), "action server listening");

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("action server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
