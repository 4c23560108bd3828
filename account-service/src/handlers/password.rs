use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{ErrorResponse, MessageResponse, ResetPasswordRequest, SendResetEmailRequest},
    utils::ValidatedJson,
    AppState,
};

/// Send a password-reset token to an active account
#[utoipa::path(
    post,
    path = "/api/account/reset-password-email",
    request_body = SendResetEmailRequest,
    responses(
        (status = 200, description = "Reset token sent", body = MessageResponse),
        (status = 400, description = "Account is not active", body = ErrorResponse),
        (status = 404, description = "Email not registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn send_reset_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendResetEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .account_service
        .send_reset_token(&req.email)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to dispatch reset token");
            e
        })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Reset token sent".to_string(),
        }),
    ))
}

/// Reset the password with a token
#[utoipa::path(
    put,
    path = "/api/account/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset successful", body = MessageResponse),
        (status = 400, description = "Token expired, passwords do not match, or account inactive", body = ErrorResponse),
        (status = 404, description = "Token not recognized", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.password != req.password_confirmation {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Passwords do not match"
        )));
    }

    state
        .account_service
        .reset_password(&req.token, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Password reset failed");
            e
        })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Password reset successful. You can now login with your new password."
                .to_string(),
        }),
    ))
}
