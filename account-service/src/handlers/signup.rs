use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{AccountResponse, ErrorResponse, SignupRequest},
    utils::ValidatedJson,
    AppState,
};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AccountResponse),
        (status = 400, description = "Username or email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .account_service
        .register(&req.username, &req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Signup failed");
            e
        })?;

    Ok((StatusCode::OK, Json(AccountResponse::from(account))))
}
