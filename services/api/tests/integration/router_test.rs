//! HTTP surface checks that resolve before any database access.

use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use playnext_api::infra::gemini::GeminiClient;
use playnext_api::infra::igdb::IgdbClient;
use playnext_api::infra::password::BcryptHasher;
use playnext_api::router::build_router;
use playnext_api::state::AppState;
use playnext_auth_types::identity::JwtSecret;
use playnext_testing::auth::{MockAuth, bearer};

use crate::helpers::TEST_JWT_SECRET;

fn test_state() -> AppState {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:6379")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();
    let http = reqwest::Client::new();
    AppState {
        db: DatabaseConnection::Disconnected,
        redis,
        jwt_secret: JwtSecret::new(TEST_JWT_SECRET),
        access_token_expire_minutes: 30,
        recommendation_ttl_secs: 3600,
        igdb: IgdbClient::new(
            http.clone(),
            "client-id".into(),
            "client-secret".into(),
            "http://127.0.0.1:9/v4".into(),
            "http://127.0.0.1:9/oauth2/token".into(),
            None,
        ),
        gemini: GeminiClient::new(
            http,
            "key".into(),
            "gemini-test".into(),
            "http://127.0.0.1:9".into(),
        ),
        hasher: BcryptHasher::default(),
    }
}

fn server() -> TestServer {
    TestServer::new(build_router(test_state())).unwrap()
}

#[tokio::test]
async fn should_report_liveness_and_unready_database() {
    let server = server();

    server.get("/healthz").await.assert_status_ok();
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_challenge_requests_without_token() {
    let response = server().get("/users/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let body: Value = response.json();
    assert_eq!(body["kind"], "UNAUTHORIZED");
    assert_eq!(body["detail"], "Not authenticated");
}

#[tokio::test]
async fn should_reject_expired_token() {
    let auth = MockAuth::new("alice", TEST_JWT_SECRET);
    let (name, value) = bearer(&auth.expired_token());

    let response = server()
        .get("/users/me/ratings")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Token has expired");
}

#[tokio::test]
async fn should_reject_token_signed_with_another_secret() {
    let auth = MockAuth::new("alice", TEST_JWT_SECRET);
    let (name, value) = bearer(&auth.forged_token());

    let response = server()
        .get("/users/me/recommendations/")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Invalid token");
}

#[tokio::test]
async fn should_validate_registration_on_trailing_slash_route() {
    let response = server()
        .post("/users/")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "short",
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_malformed_registration_body() {
    let response = server()
        .post("/users")
        .json(&json!({ "username": "alice" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn should_reject_token_form_without_password() {
    let response = server()
        .post("/auth/token")
        .form(&[("username", "alice")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
}
