//! Error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nodes::{FieldError, NodeError};
use serde::Serialize;
use tracing::warn;

/// JSON error body: `{"error": kind, "message": ..., "errors": [...]}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
    pub errors: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "<[FieldError]>::is_empty")]
    errors: &'a [FieldError],
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }
}

/// Malformed or schema-violating input is 422 and the handler never ran;
/// every failure after the handler started is 400.
impl From<NodeError> for ApiError {
    fn from(err: NodeError) -> Self {
        let status = match err {
            NodeError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            NodeError::InvalidOutput(_) | NodeError::Handler(_) | NodeError::Panicked(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
            errors: err.field_errors().to_vec(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), error = %self.message, "request failed");
        }
        let body = ErrorBody {
            error: self.kind,
            message: &self.message,
            errors: &self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}
