use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{
        AccountResponse, ActivateAccountRequest, ErrorResponse, MessageResponse,
        SendConfirmationRequest,
    },
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

/// Send a confirmation code to an inactive account
#[utoipa::path(
    post,
    path = "/api/account/confirmation",
    request_body = SendConfirmationRequest,
    responses(
        (status = 200, description = "Confirmation code sent", body = MessageResponse),
        (status = 400, description = "Account is already active", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
        (status = 404, description = "Email not registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn send_confirmation(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<SendConfirmationRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .account_service
        .send_confirmation_code(&req.email)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, session = %claims.sub, "Failed to dispatch confirmation code");
            e
        })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Confirmation code sent".to_string(),
        }),
    ))
}

/// Activate an account with a confirmation code
#[utoipa::path(
    post,
    path = "/api/account/activate",
    request_body = ActivateAccountRequest,
    responses(
        (status = 200, description = "Account activated", body = AccountResponse),
        (status = 400, description = "Code expired, code mismatch, or account already active", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse),
        (status = 404, description = "Email or code not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn activate(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<ActivateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .account_service
        .activate_account(&req.email, &req.code)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, session = %claims.sub, "Activation failed");
            e
        })?;

    Ok((StatusCode::OK, Json(AccountResponse::from(account))))
}
