use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{ErrorResponse, LoginRequest, SessionResponse},
    utils::ValidatedJson,
    AppState,
};

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Password does not match", body = ErrorResponse),
        (status = 404, description = "Email not registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state
        .account_service
        .login(&req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Login failed");
            e
        })?;

    Ok((
        StatusCode::OK,
        Json(SessionResponse {
            access_token: session.access_token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
            username: session.account.username,
            email: session.account.email,
        }),
    ))
}
