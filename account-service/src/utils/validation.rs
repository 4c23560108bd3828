use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::dtos::ErrorResponse;

/// Json extractor that runs the payload's `validator` rules before the
/// handler sees it. Unparseable bodies map to 400, rule violations to 422.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("Malformed body: {}", e)))?;

        payload.validate().map_err(|e| {
            reject(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid request: {}", e),
            )
        })?;

        Ok(ValidatedJson(payload))
    }
}

fn reject(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
