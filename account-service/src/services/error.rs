use service_core::error::AppError;
use std::fmt;
use thiserror::Error;

/// Why a confirmation code that was on file got rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRejection {
    /// The code was created at or before the six-hour limit.
    Expired,
    /// The submitted value does not equal the stored one.
    Mismatch,
}

impl fmt::Display for CodeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeRejection::Expired => write!(f, "expired"),
            CodeRejection::Mismatch => write!(f, "mismatch"),
        }
    }
}

/// Business outcomes of the account orchestrations plus opaque collaborator
/// failures. The named kinds are expected results, mapped 1:1 to HTTP
/// statuses by the presentation layer; everything else surfaces as a 500.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Email error: {0}")]
    Email(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Username is unavailable")]
    UnavailableUsername,

    #[error("Email is unavailable")]
    UnavailableEmail,

    #[error("Account is already active")]
    AccountAlreadyActive,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Confirmation code not found")]
    ConfirmationCodeNotFound,

    #[error("Invalid confirmation code: {0}")]
    InvalidConfirmationCode(CodeRejection),

    #[error("Invalid param: {0}")]
    InvalidParam(&'static str),

    #[error("Password does not match")]
    PasswordMismatch,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::Email(e) => AppError::EmailError(e),
            ServiceError::NotFound(param) => {
                AppError::NotFound(anyhow::anyhow!("{} not found", param))
            }
            ServiceError::ConfirmationCodeNotFound => {
                AppError::NotFound(anyhow::anyhow!("Confirmation code not found"))
            }
            ServiceError::UnavailableUsername
            | ServiceError::UnavailableEmail
            | ServiceError::AccountAlreadyActive
            | ServiceError::AccountInactive
            | ServiceError::PasswordMismatch => AppError::BadRequest(anyhow::anyhow!("{}", err)),
            ServiceError::InvalidConfirmationCode(reason) => {
                AppError::BadRequest(anyhow::anyhow!("Invalid confirmation code: {}", reason))
            }
            ServiceError::InvalidParam(param) => {
                AppError::BadRequest(anyhow::anyhow!("Invalid param: {}", param))
            }
        }
    }
}
