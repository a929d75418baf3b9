//! Request handlers and shared state.

pub mod actions;
pub mod compute;
pub mod health;

use std::sync::Arc;

use nodes::NodeRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<NodeRegistry>,
}
