//! Error responses of the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::auth::AuthError;
use crate::validation::FieldErrors;

/// Message returned with every validation failure.
pub const INVALID_DATA_MESSAGE: &str = "The given data was invalid.";

/// Message returned when authentication fails.
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated";

/// Errors a request handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Credentials missing or not accepted
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] AuthError),

    /// One or more request fields failed validation
    #[error("invalid data in {} field(s)", .0.len())]
    Invalid(FieldErrors),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Summary message
    pub message: &'static str,
    /// Per-field messages, present for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Invalid(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthenticated(_) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message: UNAUTHENTICATED_MESSAGE,
                    errors: None,
                },
            ),
            ApiError::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    message: INVALID_DATA_MESSAGE,
                    errors: Some(errors),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
