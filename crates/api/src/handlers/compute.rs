//! CPU-bound demo endpoint.
//!
//! The recursion runs on the blocking pool so concurrent requests to other
//! routes keep being served.

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::ApiError;

pub const DEFAULT_N: u32 = 42;
/// The recursion is exponential in `n`.
pub const MAX_N: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct ComputeQuery {
    #[serde(default = "default_n")]
    pub n: u32,
}

fn default_n() -> u32 {
    DEFAULT_N
}

/// `GET /compute?n=42`; the body is the bare result, e.g. `267914296`.
pub async fn compute(query: Result<Query<ComputeQuery>, QueryRejection>) -> Result<Json<u64>, ApiError> {
    let Query(ComputeQuery { n }) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if n > MAX_N {
        return Err(ApiError::bad_request(format!("n must be at most {MAX_N}")));
    }

    let result = tokio::task::spawn_blocking(move || fibonacci(n))
        .await
        .map_err(|e| ApiError::internal(format!("compute task failed: {e}")))?;

    debug!(n, result, "computed fibonacci");
    Ok(Json(result))
}

/// Deliberately naive recursive Fibonacci.
pub fn fibonacci(n: u32) -> u64 {
    if n < 2 {
        n as u64
    } else {
        fibonacci(n - 1) + fibonacci(n - 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci_values() {
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        assert_eq!(fibonacci(7), 13);
        assert_eq!(fibonacci(20), 6765);
    }
}
