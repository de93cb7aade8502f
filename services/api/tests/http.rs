//! End-to-end tests of the auth HTTP surface, driven in-process through the router
//! with the in-memory user store.

use api_lib::{
    adapters::InMemoryUserRepository,
    config::{Config, UserStore},
    web::{require_auth, router, state::AppState},
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware, routing::get, Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret-test-secret-test-secret";

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        user_store: UserStore::Memory,
        log_level: tracing::Level::INFO,
        jwt_secret: SECRET.to_string(),
        token_ttl_secs: 3600,
        cors_allowed_origin: None,
    }
}

fn test_app() -> (Router, Arc<AppState>) {
    let users = Arc::new(InMemoryUserRepository::new());
    let state = Arc::new(AppState::new(users, Arc::new(test_config())));
    (router(state.clone()), state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/api/auth/register",
            json!({ "name": name, "email": email, "password": password }),
        ),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json("/api/auth/login", json!({ "email": email, "password": password })),
    )
    .await
}

fn assert_public_user(user: &Value) {
    let mut keys: Vec<&str> = user.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["email", "id", "name"]);
}

//=========================================================================================
// Registration
//=========================================================================================

#[tokio::test]
async fn register_returns_201_with_token_and_public_user() {
    let (app, state) = test_app();
    let (status, body) = register(&app, "Ada", "ada@example.com", "pw-123").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_public_user(&body["user"]);
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");

    let token = body["token"].as_str().unwrap();
    let claims = state.tokens().verify(token).unwrap();
    assert_eq!(claims.user_id.to_string(), body["user"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn duplicate_email_is_rejected_regardless_of_password() {
    let (app, _) = test_app();
    register(&app, "Ada", "ada@example.com", "pw-123").await;

    for password in ["pw-123", "something-else"] {
        let (status, body) = register(&app, "Other", "ada@example.com", password).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "User already exists" }));
    }
}

#[tokio::test]
async fn duplicate_email_differing_only_in_case_is_rejected() {
    let (app, _) = test_app();
    register(&app, "Ada", "ada@example.com", "pw-123").await;

    let (status, body) = register(&app, "Other", "Ada@Example.com", "pw-456").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));

    let (status, body) = login(&app, "ADA@example.com", "pw-123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn oversized_token_lifetime_does_not_panic() {
    let config = Config {
        token_ttl_secs: i64::MAX,
        ..test_config()
    };
    let state = Arc::new(AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(config),
    ));
    let app = router(state.clone());

    let (status, body) = register(&app, "Ada", "ada@example.com", "pw-123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(state.tokens().verify(body["token"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn missing_fields_are_a_json_validation_error() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        post_json("/api/auth/register", json!({ "email": "ada@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn malformed_json_is_a_json_validation_error() {
    let (app, _) = test_app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

//=========================================================================================
// Login
//=========================================================================================

#[tokio::test]
async fn login_returns_200_with_token_and_public_user() {
    let (app, _) = test_app();
    let (_, registered) = register(&app, "Ada", "ada@example.com", "pw-123").await;

    let (status, body) = login(&app, "ada@example.com", "pw-123").await;
    assert_eq!(status, StatusCode::OK);
    assert_public_user(&body["user"]);
    assert_eq!(body["user"], registered["user"]);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let (app, _) = test_app();
    register(&app, "Ada", "ada@example.com", "pw-123").await;

    let wrong_password = login(&app, "ada@example.com", "not-it").await;
    let unknown_email = login(&app, "ghost@example.com", "pw-123").await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1, json!({ "message": "Invalid credentials" }));
}

//=========================================================================================
// Bearer Guard
//=========================================================================================

#[tokio::test]
async fn guard_accepts_a_fresh_token() {
    let (app, _) = test_app();
    let (_, body) = register(&app, "Ada", "ada@example.com", "pw-123").await;
    let token = body["token"].as_str().unwrap();

    let (status, me) = send(
        &app,
        get_with_auth("/api/auth/me", Some(&format!("Bearer {}", token))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["userId"], body["user"]["id"]);
}

#[tokio::test]
async fn guard_rejects_missing_and_malformed_tokens() {
    let (app, _) = test_app();

    let (status, body) = send(&app, get_with_auth("/api/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "No token, authorization denied" }));

    for value in ["Bearer not-a-token", "Token abc", "Bearer a.b.c"] {
        let (status, body) = send(&app, get_with_auth("/api/auth/me", Some(value))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Token is not valid" }));
    }
}

#[tokio::test]
async fn guard_enforces_the_one_hour_lifetime() {
    let (app, state) = test_app();
    let user_id = Uuid::new_v4();

    let recent = state
        .tokens()
        .issue_at(user_id, Utc::now() - Duration::minutes(59))
        .unwrap();
    let (status, _) = send(
        &app,
        get_with_auth("/api/auth/me", Some(&format!("Bearer {}", recent))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stale = state
        .tokens()
        .issue_at(user_id, Utc::now() - Duration::minutes(61))
        .unwrap();
    let (status, body) = send(
        &app,
        get_with_auth("/api/auth/me", Some(&format!("Bearer {}", stale))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token is not valid" }));
}

#[tokio::test]
async fn rejected_requests_never_reach_the_handler() {
    let (_, state) = test_app();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let guarded = Router::new()
        .route(
            "/probe",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "reached"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    for auth in [None, Some("Bearer garbage"), Some("Basic abc")] {
        let response = guarded
            .clone()
            .oneshot(get_with_auth("/probe", auth))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let token = state.tokens().issue(Uuid::new_v4()).unwrap();
    let response = guarded
        .oneshot(get_with_auth("/probe", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

//=========================================================================================
// Utility Routes
//=========================================================================================

#[tokio::test]
async fn health_and_openapi_are_served() {
    let (app, _) = test_app();

    let (status, body) = send(&app, get_with_auth("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, doc) = send(&app, get_with_auth("/api-docs/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/auth/register").is_some());
    assert!(doc["paths"].get("/api/auth/login").is_some());
}
