//! HTTP-level tests: status mapping and the auth gate, driven through the
//! router with `tower::oneshot` over the in-memory stores.

mod common;

use account_service::{
    build_router,
    config::{
        AccountConfig, Environment, JwtConfig, MongoConfig, SecurityConfig, SmtpConfig,
        SwaggerConfig, SwaggerMode,
    },
    models::AccountStatus,
    AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use common::{harness, seed_account, Harness};

fn test_config() -> AccountConfig {
    AccountConfig {
        common: service_core::config::Config { port: 8080 },
        environment: Environment::Prod,
        service_name: "account-service".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "unused".to_string(),
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            session_token_expiry_minutes: 60,
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            user: String::new(),
            password: String::new(),
            from_email: "Account API <no-reply@accountapi.dev>".to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
    }
}

fn test_app(h: &Harness) -> Router {
    let state = AppState {
        config: test_config(),
        accounts: h.accounts.clone(),
        codes: h.codes.clone(),
        email: h.mailer.clone(),
        jwt: h.jwt.clone(),
        account_service: h.service.clone(),
    };
    build_router(state).expect("router")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn signup_returns_the_new_account() {
    let h = harness();
    let app = test_app(&h);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/signup",
            json!({
                "username": "jdoe",
                "email": "jdoe@example.com",
                "password": "password123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "jdoe");
    assert_eq!(body["status"], "inactive");
}

#[tokio::test]
async fn signup_with_a_malformed_email_is_unprocessable() {
    let h = harness();
    let app = test_app(&h);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/signup",
            json!({
                "username": "jdoe",
                "email": "not-an-email",
                "password": "password123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn signup_with_a_malformed_body_is_a_bad_request() {
    let h = harness();
    let app = test_app(&h);

    let request = Request::builder()
        .method("POST")
        .uri("/api/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_an_unknown_email_is_not_found() {
    let h = harness();
    let app = test_app(&h);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({
                "email": "nobody@example.com",
                "password": "password123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_with_a_wrong_password_is_a_bad_request() {
    let h = harness();
    seed_account(
        &h,
        "jdoe",
        "jdoe@example.com",
        "password123",
        AccountStatus::Active,
    );
    let app = test_app(&h);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({
                "email": "jdoe@example.com",
                "password": "not-the-password"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn confirmation_dispatch_requires_a_session_token() {
    let h = harness();
    let app = test_app(&h);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/account/confirmation",
            json!({ "email": "jdoe@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn confirmation_dispatch_reaches_the_handler_with_a_valid_token() {
    let h = harness();
    let app = test_app(&h);

    let token = h
        .jwt
        .generate_session_token("account-1", "jdoe@example.com")
        .expect("token");

    let mut request = json_request(
        "POST",
        "/api/account/confirmation",
        json!({ "email": "jdoe@example.com" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    // Past the gate and through the session extractor; the unknown email
    // maps to 404
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn activation_passes_the_auth_gate_with_a_valid_token() {
    let h = harness();
    let app = test_app(&h);

    let token = h
        .jwt
        .generate_session_token("account-1", "jdoe@example.com")
        .expect("token");

    let mut request = json_request(
        "POST",
        "/api/account/activate",
        json!({ "email": "jdoe@example.com", "code": "123456" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    // Past the gate; the unknown email maps to 404
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_with_mismatched_confirmation_is_a_bad_request() {
    let h = harness();
    let app = test_app(&h);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/account/reset-password",
            json!({
                "token": "deadbeef",
                "password": "newPassword123",
                "password_confirmation": "somethingElse1"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_the_store_as_up() {
    let h = harness();
    let app = test_app(&h);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
