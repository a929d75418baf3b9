//! Typed error type for the client crate.

use serde_json::Value;
use thiserror::Error;

/// Everything a client operation can fail with.
///
/// `Timeout`/`Transport` mean no response arrived; `Api` means the remote
/// service answered with a non-success status.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("remote service returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Model(#[from] models::ModelError),
}

impl ClientError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_builder() {
            Self::InvalidRequest(err)
        } else {
            Self::Transport(err)
        }
    }

    /// Build an `Api` error from a non-success response body.
    ///
    /// The platform answers with `{"message": ...}`; anything else is kept
    /// verbatim.
    pub(crate) fn api(status: reqwest::StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown status").to_string()
                } else {
                    body.clone()
                }
            });
        Self::Api {
            status: status.as_u16(),
            message,
            body,
        }
    }

    /// HTTP status of a remote application error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// True when the request never received an application-level response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}
