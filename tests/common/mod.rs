use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bookstore::router::init_router;
use bookstore::state::{AppState, Repositories};
use bookstore_auth::{MemoryAuditSink, TokenIssuer};
use bookstore_config::{CorsConfig, JwtConfig};
use bookstore_core::PasswordHasher;
use bookstore_db::InMemoryRepository;
use http_body_util::BodyExt;
use jsonwebtoken::Algorithm;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryRepository,
    pub audit: Arc<MemoryAuditSink>,
    pub tokens: TokenIssuer,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET, Algorithm::HS256, 3600).unwrap()
}

pub fn setup_test_app() -> TestApp {
    let store = InMemoryRepository::new();
    let audit = Arc::new(MemoryAuditSink::new());
    let tokens = TokenIssuer::new(&test_jwt_config());

    let state = AppState::new(
        Repositories::from_store(store.clone()),
        PasswordHasher::new(4).unwrap(),
        tokens.clone(),
        audit.clone(),
        CorsConfig::default(),
    );

    TestApp {
        router: init_router(state),
        store,
        audit,
        tokens,
    }
}

/// Sends a request and returns the status with the decoded JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

pub async fn send_request(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

#[allow(dead_code)]
pub async fn register(app: &TestApp, username: &str, password: &str, role: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "username": username, "password": password, "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

#[allow(dead_code)]
pub async fn login(app: &TestApp, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Registers a user with the given role and returns a bearer token for it.
#[allow(dead_code)]
pub async fn token_for(app: &TestApp, username: &str, role: &str) -> String {
    register(app, username, "password123", role).await;
    login(app, username, "password123").await
}
