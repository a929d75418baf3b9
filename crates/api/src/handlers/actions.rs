//! One `POST` route per registered action, plus discovery.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use nodes::{RegisteredNode, Schema};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::AppState;
use crate::{ApiError, ACTIONS_PREFIX};

#[derive(Serialize)]
pub struct ActionInfo<'a> {
    pub name: &'a str,
    pub path: String,
    pub input: &'a Schema,
    pub output: &'a Schema,
}

/// Routes relative to [`ACTIONS_PREFIX`], generated from the registry.
pub fn router(state: AppState) -> Router<AppState> {
    let mut router = Router::new().route("/", get(list));

    for node in state.registry.iter() {
        let node = Arc::clone(node);
        info!(action = %node.name(), path = %format!("{ACTIONS_PREFIX}/{}", node.name()), "publishing action");
        let path = format!("/{}", node.name());
        router = router.route(&path, post(move |body: Bytes| dispatch(Arc::clone(&node), body)));
    }

    router
}

/// `GET /actions`
pub async fn list(State(state): State<AppState>) -> Json<Value> {
    let actions: Vec<ActionInfo<'_>> = state
        .registry
        .iter()
        .map(|node| ActionInfo {
            name: node.name(),
            path: format!("{ACTIONS_PREFIX}/{}", node.name()),
            input: node.input_schema(),
            output: node.output_schema(),
        })
        .collect();
    Json(serde_json::json!({ "actions": actions }))
}

/// Validate the body, call the handler once, return its output as JSON.
///
/// Handlers are synchronous and may block, so they run on the blocking pool.
async fn dispatch(node: Arc<RegisteredNode>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let worker = Arc::clone(&node);
    let result = tokio::task::spawn_blocking(move || worker.dispatch(&body))
        .await
        .map_err(|e| ApiError::internal(format!("action task failed: {e}")))?;

    match result {
        Ok(output) => Ok(Json(output)),
        Err(err) => {
            warn!(action = %node.name(), kind = err.kind(), error = %err, "action failed");
            Err(err.into())
        }
    }
}
