pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AccountConfig, SwaggerMode};
use crate::services::{AccountService, AccountStore, ConfirmationCodeStore, EmailProvider, JwtService};
use service_core::error::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::signup::signup,
        handlers::session::login,
        handlers::confirmation::send_confirmation,
        handlers::confirmation::activate,
        handlers::password::send_reset_email,
        handlers::password::reset_password,
    ),
    components(
        schemas(
            dtos::SignupRequest,
            dtos::AccountResponse,
            dtos::LoginRequest,
            dtos::SessionResponse,
            dtos::SendConfirmationRequest,
            dtos::ActivateAccountRequest,
            dtos::SendResetEmailRequest,
            dtos::ResetPasswordRequest,
            dtos::MessageResponse,
            dtos::ErrorResponse,
            models::AccountStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Account", description = "Account registration, login, activation and password reset"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AccountConfig,
    pub accounts: Arc<dyn AccountStore>,
    pub codes: Arc<dyn ConfirmationCodeStore>,
    pub email: Arc<dyn EmailProvider>,
    pub jwt: JwtService,
    pub account_service: AccountService,
}

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    // Routes behind a valid session token
    let protected_routes = Router::new()
        .route(
            "/api/account/confirmation",
            post(handlers::send_confirmation),
        )
        .route("/api/account/activate", post(handlers::activate))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let mut app = Router::new().route("/health", get(health_check));

    let swagger_enabled = match state.config.environment {
        config::Environment::Dev => true,
        config::Environment::Prod => state.config.swagger.enabled == SwaggerMode::Public,
    };

    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    let app = app
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .route(
            "/api/account/reset-password-email",
            post(handlers::send_reset_email),
        )
        .route("/api/account/reset-password", put(handlers::reset_password))
        .merge(protected_routes)
        .with_state(state.clone())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .filter_map(|o| match o.parse::<HeaderValue>() {
                            Ok(value) => Some(value),
                            Err(e) => {
                                tracing::error!(origin = %o, error = %e, "Invalid CORS origin, skipping");
                                None
                            }
                        })
                        .collect::<Vec<HeaderValue>>(),
                )
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Service is unhealthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.account_service.health().await.map_err(|e| {
        tracing::error!(error = %e, "MongoDB health check failed");
        AppError::from(e)
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "mongodb": "up"
        }
    })))
}
