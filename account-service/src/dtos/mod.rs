pub mod account;

use serde::Serialize;
use utoipa::ToSchema;

pub use account::{
    AccountResponse, ActivateAccountRequest, LoginRequest, MessageResponse, ResetPasswordRequest,
    SendConfirmationRequest, SendResetEmailRequest, SessionResponse, SignupRequest,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "email not found")]
    pub error: String,
}
