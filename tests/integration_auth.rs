mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bookstore_auth::{AuthAction, AuthOutcome};
use bookstore_db::UserRepository;
use common::{TEST_SECRET, login, register, send, send_request, setup_test_app};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_login_scenario() {
    let app = setup_test_app();
    let credentials = json!({ "username": "alice", "password": "secret1", "role": "user" });

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(credentials),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "alice", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_identical() {
    let app = setup_test_app();
    register(&app, "alice", "secret1", "user").await;

    let wrong_password = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "alice", "password": "nope-nope" })),
    )
    .await;
    let unknown_user = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "mallory", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_token_claims() {
    let app = setup_test_app();
    register(&app, "bob", "secret1", "admin").await;
    let token = login(&app, "bob", "secret1").await;

    let claims = decode::<Value>(
        &token,
        &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;

    assert_eq!(claims["sub"], "1");
    assert_eq!(claims["username"], "bob");
    assert_eq!(claims["role"], "admin");
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        3600
    );
}

#[tokio::test]
async fn test_register_rejects_invalid_role() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "username": "carol", "password": "secret1", "role": "superuser" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("role"));
    assert_eq!(app.store.count_by_username("carol").await.unwrap(), 0);
    assert_eq!(
        app.audit.outcomes(),
        vec![(AuthAction::Register, AuthOutcome::InvalidInput)]
    );
}

#[tokio::test]
async fn test_rejected_bodies_are_audited() {
    let app = setup_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "username": "dave", "password": "12345", "role": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "dave" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(
        app.audit.outcomes(),
        vec![
            (AuthAction::Register, AuthOutcome::InvalidInput),
            (AuthAction::Login, AuthOutcome::InvalidInput),
        ]
    );
}

#[tokio::test]
async fn test_register_rejects_password_over_bcrypt_limit() {
    let app = setup_test_app();
    let password = "a".repeat(73);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "username": "long", "password": password, "role": "user" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "password must be at most 72 bytes");
}

#[tokio::test]
async fn test_login_with_shared_72_byte_prefix_fails() {
    let app = setup_test_app();
    let password = "a".repeat(72);
    register(&app, "prefix", &password, "user").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "prefix", "password": format!("{}WRONG", password) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app, "prefix", &password).await;
}

#[tokio::test]
async fn test_register_rejects_short_password_and_empty_username() {
    let app = setup_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "username": "dave", "password": "12345", "role": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "username": "", "password": "secret1", "role": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/users/register")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": \"erin\", "))
        .unwrap();
    let (status, body) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "erin" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password is required");
}

#[tokio::test]
async fn test_storage_failure_is_masked() {
    let app = setup_test_app();
    app.store.set_unavailable(true);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "username": "frank", "password": "secret1", "role": "user" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_auth_outcomes_are_audited() {
    let app = setup_test_app();
    register(&app, "grace", "secret1", "user").await;
    let _ = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "grace", "password": "bad-password" })),
    )
    .await;
    login(&app, "grace", "secret1").await;

    assert_eq!(
        app.audit.outcomes(),
        vec![
            (AuthAction::Register, AuthOutcome::Success),
            (AuthAction::Login, AuthOutcome::BadCredentials),
            (AuthAction::Login, AuthOutcome::Success),
        ]
    );
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = setup_test_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    use tower::ServiceExt;
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
