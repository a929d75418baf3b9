//! In-process stand-in for the remote platform.
//!
//! Routes are canned `(method, path) -> (status, body)` pairs; every
//! request is recorded so tests can assert on exactly what was sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use client::{Client, ClientConfig};
use serde_json::Value;

pub const API_KEY: &str = "test-api-key";
const BASE_PATH: &str = "/api/v1";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: Option<Value>,
    delay: Option<Duration>,
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<HashMap<(Method, String), Canned>>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockRemote {
    pub base_url: String,
    state: MockState,
}

impl MockRemote {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}{BASE_PATH}"),
            state,
        }
    }

    /// Answer `method path` (relative to the base path) with `status` and `body`.
    pub fn on(&self, method: Method, path: &str, status: StatusCode, body: Option<Value>) -> &Self {
        self.insert(method, path, Canned { status, body, delay: None });
        self
    }

    pub fn on_slow(&self, method: Method, path: &str, delay: Duration) -> &Self {
        self.insert(
            method,
            path,
            Canned {
                status: StatusCode::OK,
                body: Some(Value::Object(Default::default())),
                delay: Some(delay),
            },
        );
        self
    }

    fn insert(&self, method: Method, path: &str, canned: Canned) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), canned);
    }

    pub fn client(&self) -> Client {
        self.client_with_timeout(Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> Client {
        let cfg = ClientConfig::builder()
            .api_key(API_KEY)
            .base_url(&self.base_url)
            .timeout(timeout)
            .build_with(|_| None)
            .unwrap();
        Client::new(cfg).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> Recorded {
        let all = self.requests();
        assert_eq!(all.len(), 1, "expected exactly one request, got {all:?}");
        all.into_iter().next().unwrap()
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(BASE_PATH)
        .unwrap_or(uri.path())
        .to_string();

    state.recorded.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body: serde_json::from_slice(&body).ok(),
    });

    let canned = state.routes.lock().unwrap().get(&(method, path)).cloned();
    let Some(canned) = canned else {
        return (StatusCode::NOT_FOUND, axum::Json(serde_json::json!({ "message": "not found" })))
            .into_response();
    };

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    match canned.body {
        Some(body) => (canned.status, axum::Json(body)).into_response(),
        None => canned.status.into_response(),
    }
}
