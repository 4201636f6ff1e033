//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every handler returns one
//! of two body shapes: a `{code, message}` error, or a field-keyed validation
//! map.
//!
//! # Key invariants and assumptions
//! - Error responses carry a stable `code` and a human-readable `message`.
//! - Validation failures are always 400 and name the offending field.
//! - Internal errors log details server-side but return generic messages.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use villa_model::ValidationErrors;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiErrorBody {
    Error(ErrorResponse),
    Validation(ValidationErrors),
}

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use villa_api::api::error::api_not_found;
///
/// let err = api_not_found("villa not found");
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// assert_eq!(err.code(), Some("not_found"));
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    fn with_code(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            body: ApiErrorBody::Error(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                request_id: None,
            }),
        }
    }

    /// The error code, or `None` for validation failures.
    pub fn code(&self) -> Option<&str> {
        match &self.body {
            ApiErrorBody::Error(body) => Some(body.code.as_str()),
            ApiErrorBody::Validation(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 400 error for malformed input (zero ids, id mismatch, missing body).
pub fn api_bad_request(message: &str) -> ApiError {
    ApiError::with_code(StatusCode::BAD_REQUEST, "bad_request", message)
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    ApiError::with_code(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 400 validation error carrying per-field messages.
pub fn api_validation(errors: ValidationErrors) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ApiErrorBody::Validation(errors),
    }
}

/// Build a 400 validation error for a single field.
pub fn api_validation_field(key: &str, message: &str) -> ApiError {
    api_validation(ValidationErrors::single(key, message))
}

/// Build a 500 Internal Server Error from a store error.
///
/// Logs the store error; the response only carries `message`.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "villa storage error");
    ApiError::with_code(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 500 Internal Server Error without a store error.
pub fn api_internal_message(message: &str) -> ApiError {
    ApiError::with_code(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}
