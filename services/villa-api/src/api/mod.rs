//! Villa HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the request-body helpers shared by the
//! villa and villa number handlers.
pub mod error;
pub mod openapi;
pub mod system;
pub mod types;
pub mod villa_numbers;
pub mod villas;

use crate::api::error::{ApiError, api_bad_request};
use axum::Json;
use axum::extract::rejection::JsonRejection;

pub(crate) const VILLA_EXISTS: &str = "Villa already exists!";
pub(crate) const VILLA_NUMBER_EXISTS: &str = "Villa Number already exists!";
pub(crate) const VILLA_ID_INVALID: &str = "Villa ID is Invalid!";

/// Unwrap a JSON body that must be present.
///
/// A literal `null`, an empty body, and undecodable JSON are all 400.
pub(crate) fn require_body<T>(
    body: Result<Json<Option<T>>, JsonRejection>,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(Some(value))) => Ok(value),
        Ok(Json(None)) => {
            tracing::warn!("rejected null request body");
            Err(api_bad_request("request body is required"))
        }
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::warn!(error = %message, "rejected request body");
            Err(api_bad_request(&message))
        }
    }
}
