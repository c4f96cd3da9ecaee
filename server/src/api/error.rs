use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::recipes::responses::ValidationFailureResponse;
use super::ErrorResponse;
use crate::store::StoreError;
use crate::validation::ValidationFailure;

pub const NOT_FOUND_MESSAGE: &str = "No recipe found";

/// Every way a recipes handler can fail.
#[derive(Debug)]
pub enum ApiError {
    /// Rejected payload. Reported with status 200 and the failure envelope.
    Validation(ValidationFailure),
    NotFound,
    /// The `{id}` path segment is not an integer.
    MalformedId(String),
    /// Anything unexpected. The message is what the client sees; details are logged.
    Internal(&'static str),
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Validation(failure)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Pool(e) => {
                tracing::error!("Failed to get DB connection: {}", e);
                ApiError::Internal("Database connection failed")
            }
            StoreError::Query(e) => {
                tracing::error!("Recipe query failed: {}", e);
                ApiError::Internal("Database query failed")
            }
            StoreError::Unavailable(reason) => {
                tracing::error!("Recipe store unavailable: {}", reason);
                ApiError::Internal("Storage unavailable")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Validation(failure) => {
                tracing::debug!(required = %failure.required(), "recipe payload rejected");
                return (StatusCode::OK, Json(ValidationFailureResponse::from(&failure)))
                    .into_response();
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
            ApiError::MalformedId(raw) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid recipe id: {}", raw),
            ),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Parse the `{id}` path segment.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::MalformedId(raw.to_string()))
}
