//! Node-level error types.

use thiserror::Error;

use crate::schema::{FieldError, ValidationErrors};

/// Errors returned while dispatching a request to a handler.
///
/// The server maps the variant to a status:
/// - `InvalidInput` — the handler was never called.
/// - `Handler` / `Panicked` — the handler ran and failed.
/// - `InvalidOutput` — the handler returned something its schema rejects.
#[derive(Debug, Error, Clone)]
pub enum NodeError {
    #[error("invalid input: {0}")]
    InvalidInput(ValidationErrors),

    #[error("invalid output: {0}")]
    InvalidOutput(ValidationErrors),

    #[error("{0}")]
    Handler(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl NodeError {
    /// Short machine-readable tag for error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_)  => "invalid_input",
            Self::InvalidOutput(_) => "invalid_output",
            Self::Handler(_)       => "handler_error",
            Self::Panicked(_)      => "handler_panicked",
        }
    }

    /// Per-field details, empty for handler failures.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::InvalidInput(errors) | Self::InvalidOutput(errors) => &errors.0,
            Self::Handler(_) | Self::Panicked(_) => &[],
        }
    }
}

/// Errors raised at registration time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("cannot derive an action name from `{0}`; pass an explicit name")]
    UnnamedHandler(String),

    #[error("invalid action name '{0}': use letters, digits, '_', '-' or '.'")]
    InvalidName(String),
}
