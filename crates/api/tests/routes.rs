//! End-to-end checks of the generated routes, driven with `oneshot`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use api::router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use nodes::builtin::register_builtin;
use nodes::mock::MockHandler;
use nodes::{FieldKind, FieldSpec, NodeRegistry, Schema};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(registry: NodeRegistry) -> Router {
    router(Arc::new(registry))
}

fn builtin_app() -> Router {
    let mut registry = NodeRegistry::new();
    register_builtin(&mut registry).unwrap();
    app_with(registry)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ---------------------------------------------------------------------------
//  Actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn factorial_of_five_is_120() {
    let (status, body) = send(builtin_app(), post_json("/actions/factorial", r#"{"number":5}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": 120 }));
}

#[tokio::test]
async fn explicitly_named_action_is_published_under_its_name() {
    let (status, body) =
        send(builtin_app(), post_json("/actions/compute_factorial", r#"{"number":0}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": 1 }));
}

#[tokio::test]
async fn invalid_input_is_422_and_handler_is_not_called() {
    let mock = MockHandler::returning(json!({ "result": 1 }));
    let log = mock.call_log();
    let mut registry = NodeRegistry::new();
    registry
        .register_handler(
            "counted",
            Schema::new().field(FieldSpec::required("number", FieldKind::Integer).min(0.0)),
            Schema::new().field(FieldSpec::required("result", FieldKind::Integer)),
            Arc::new(mock),
        )
        .unwrap();
    let app = app_with(registry);

    for body in [r#"{"number":"five"}"#, r#"{"number":-1}"#, "{}", "not json"] {
        let (status, err) = send(app.clone(), post_json("/actions/counted", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body}");
        assert_eq!(err["error"], "invalid_input");
    }
    assert!(log.lock().unwrap().is_empty());

    let (status, _) = send(app, post_json("/actions/counted", r#"{"number":3}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn validation_errors_name_the_failing_field() {
    let (_, body) = send(builtin_app(), post_json("/actions/factorial", r#"{"count":5}"#)).await;
    assert_eq!(body["errors"], json!([{ "field": "number", "message": "field required" }]));
}

#[tokio::test]
async fn handler_failure_is_400_with_its_message() {
    let (status, body) =
        send(builtin_app(), post_json("/actions/factorial", r#"{"number":25}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "handler_error");
    assert!(body["message"].as_str().unwrap().contains("overflows"));
}

#[tokio::test]
async fn failing_action_does_not_affect_others() {
    let mut registry = NodeRegistry::new();
    register_builtin(&mut registry).unwrap();
    registry
        .register_handler("broken", Schema::new(), Schema::new(), Arc::new(MockHandler::panicking("oops")))
        .unwrap();
    registry
        .register_handler("refuses", Schema::new(), Schema::new(), Arc::new(MockHandler::failing("no")))
        .unwrap();
    let app = app_with(registry);

    let (status, body) = send(app.clone(), post_json("/actions/broken", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "handler_panicked");

    let (status, body) = send(app.clone(), post_json("/actions/refuses", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no");

    let (status, body) = send(app, post_json("/actions/factorial", r#"{"number":4}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": 24 }));
}

#[tokio::test]
async fn output_violating_schema_is_400() {
    let mut registry = NodeRegistry::new();
    registry
        .register_handler(
            "liar",
            Schema::new(),
            Schema::new().field(FieldSpec::required("result", FieldKind::Integer)),
            Arc::new(MockHandler::returning(json!({ "result": "many" }))),
        )
        .unwrap();

    let (status, body) = send(app_with(registry), post_json("/actions/liar", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_output");
}

#[tokio::test]
async fn unknown_action_and_wrong_method() {
    let (status, _) = send(builtin_app(), post_json("/actions/nope", "{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(builtin_app(), get("/actions/factorial")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn action_listing_includes_schemas() {
    let (status, body) = send(builtin_app(), get("/actions")).await;
    assert_eq!(status, StatusCode::OK);

    let actions = body["actions"].as_array().unwrap();
    let names: Vec<&str> = actions.iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["compute_factorial", "factorial"]);
    assert_eq!(actions[1]["path"], "/actions/factorial");
    assert_eq!(actions[1]["input"]["fields"][0]["name"], "number");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn blocking_action_does_not_stall_other_routes() {
    let mut registry = NodeRegistry::new();
    registry
        .register(Some("slow"), Schema::new(), Schema::new(), |_: Value| {
            std::thread::sleep(Duration::from_millis(1500));
            Ok(json!({ "done": true }))
        })
        .unwrap();
    let app = app_with(registry);

    let slow = tokio::spawn(send(app.clone(), post_json("/actions/slow", "{}")));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    let (status, _) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "health took {:?} while an action was running",
        started.elapsed()
    );

    let (status, body) = slow.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

// ---------------------------------------------------------------------------
//  CORS, health, compute
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_allows_any_origin() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/actions/factorial")
        .header("origin", "http://example.com")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let resp = builtin_app().oneshot(req).await.unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn health_reports_action_count() {
    let (status, body) = send(builtin_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "actions": 2 }));
}

#[tokio::test]
async fn compute_returns_fibonacci() {
    let (status, body) = send(builtin_app(), get("/compute?n=7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(13));
}

#[tokio::test]
async fn compute_rejects_bad_n() {
    let (status, _) = send(builtin_app(), get("/compute?n=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(builtin_app(), get("/compute?n=1000")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("at most"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn other_routes_stay_responsive_during_compute() {
    let app = builtin_app();

    let slow = tokio::spawn(send(app.clone(), get("/compute?n=32")));
    let (status, _) = tokio::time::timeout(Duration::from_secs(5), send(app, get("/health")))
        .await
        .expect("health check stalled behind compute");
    assert_eq!(status, StatusCode::OK);

    let (status, body) = slow.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(2_178_309));
}
