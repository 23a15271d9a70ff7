use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use materials_backend::config::AppConfig;
use materials_backend::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const SIGNUP_SECRET: &str = "test-secret";

fn setup_app_with(ttl_hours: i64) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        upload_dir: dir.path().to_str().unwrap().to_string(),
        admin_email: "admin@test.local".to_string(),
        admin_password: "password123".to_string(),
        signup_secret: SIGNUP_SECRET.to_string(),
        token_ttl_hours: ttl_hours,
        ..Default::default()
    };
    let state = AppState::new(config).unwrap();
    (create_app(state), dir)
}

fn setup_app() -> (Router, tempfile::TempDir) {
    setup_app_with(24)
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Probe whether a token still grants admin access, using the delete route
/// (404 means the gate let us through, 401 means it did not).
async fn token_is_valid(app: &Router, token: &str) -> bool {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/materials/999")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    response.status() == StatusCode::NOT_FOUND
}

#[tokio::test]
async fn test_login_returns_working_token() {
    let (app, _dir) = setup_app();

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "admin@test.local", "password": "password123"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap();
    assert_eq!(body["user"]["email"], "admin@test.local");
    assert_eq!(body["user"]["role"], "admin");
    assert!(token_is_valid(&app, token).await);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let (app, _dir) = setup_app();

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "ADMIN@TEST.LOCAL", "password": "password123"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failure_does_not_leak_which_part_was_wrong() {
    let (app, _dir) = setup_app();

    let wrong_password = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "admin@test.local", "password": "nope"}),
    )
    .await;
    let unknown_email = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "ghost@test.local", "password": "password123"}),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn test_signup_secret_gate() {
    let (app, _dir) = setup_app();

    // Wrong secret: forbidden, no account created
    let response = post_json(
        &app,
        "/api/auth/signup",
        json!({"email": "new@test.local", "password": "longenough", "secret": "guess"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "new@test.local", "password": "longenough"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct secret: account works immediately
    let response = post_json(
        &app,
        "/api/auth/signup",
        json!({"email": "new@test.local", "password": "longenough", "secret": SIGNUP_SECRET}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(token_is_valid(&app, body["token"].as_str().unwrap()).await);

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "new@test.local", "password": "longenough"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_rejects_duplicates_and_weak_passwords() {
    let (app, _dir) = setup_app();

    // Seeded admin already exists (case-insensitive key)
    let response = post_json(
        &app,
        "/api/auth/signup",
        json!({"email": "Admin@Test.Local", "password": "longenough", "secret": SIGNUP_SECRET}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        &app,
        "/api/auth/signup",
        json!({"email": "weak@test.local", "password": "short", "secret": SIGNUP_SECRET}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/auth/signup",
        json!({"email": "", "password": "longenough", "secret": SIGNUP_SECRET}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_revokes_token_and_is_idempotent() {
    let (app, _dir) = setup_app();

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "admin@test.local", "password": "password123"}),
    )
    .await;
    let token = body_json(response).await["token"].as_str().unwrap().to_string();
    assert!(token_is_valid(&app, &token).await);

    let logout = |token: String| {
        let app = app.clone();
        async move {
            app.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        }
    };

    assert_eq!(logout(token.clone()).await.status(), StatusCode::OK);
    assert!(!token_is_valid(&app, &token).await);

    // Logging out a dead token is still a success
    assert_eq!(logout(token.clone()).await.status(), StatusCode::OK);

    // Logout without any header is fine too
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    // Zero TTL makes every token expired the moment it is issued
    let (app, _dir) = setup_app_with(0);

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "admin@test.local", "password": "password123"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    assert!(!token_is_valid(&app, &token).await);
}

#[tokio::test]
async fn test_missing_and_malformed_auth_headers() {
    let (app, _dir) = setup_app();

    for header in [None, Some("Basic abc"), Some("Bearer")] {
        let mut builder = Request::builder()
            .method("DELETE")
            .uri("/api/materials/1");
        if let Some(h) = header {
            builder = builder.header("Authorization", h);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No authorization token provided");
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/materials/1")
                .header("Authorization", "Bearer forged-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}
