//! Model-level error types.

use thiserror::Error;

/// Errors produced while validating or encoding wire models.
#[derive(Debug, Error)]
pub enum ModelError {
    // ------ Validation errors ------

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// Two or more nodes share the same name.
    #[error("duplicate node name: '{0}'")]
    DuplicateNodeName(String),

    /// A connection references a node that doesn't exist in the workflow.
    #[error("connection references unknown node '{node}' ({side} side)")]
    UnknownNodeReference {
        node: String,
        side: &'static str,
    },

    // ------ Encoding errors ------

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}
