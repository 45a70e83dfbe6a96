//! # API Errors
//!
//! Error taxonomy of the form API and its mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::schema::ValidationErrors;
use crate::service::SubmitResponse;

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Form API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Required query parameter missing or empty
    #[error("{0} is required")]
    MissingParam(&'static str),

    /// Request body is not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Submitted data violates the form schema
    #[error("Form validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body for input-shape errors
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) => {
                (status, Json(SubmitResponse::rejected(errors))).into_response()
            }
            other => {
                let body = ErrorResponse {
                    error: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingParam("cityId").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(ValidationErrors::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_param_message() {
        assert_eq!(
            ApiError::MissingParam("cityId").to_string(),
            "cityId is required"
        );
    }
}
