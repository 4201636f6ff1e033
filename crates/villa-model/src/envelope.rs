//! Uniform response envelope for villa number endpoints.
//!
//! # Purpose
//! Carries the HTTP status, a success flag, an optional payload, and a list of
//! error messages in one JSON body so clients can branch on `isSuccess`
//! without inspecting transport details.
//!
//! # Key invariants
//! - A fresh envelope is `{ statusCode: 200, isSuccess: true, result: null, errorMessages: [] }`.
//! - Envelopes are built per request and never shared between requests.
//! - Setting a non-2xx status clears the success flag.
use crate::villa_number::VillaNumberDto;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder payload type for envelopes that never carry a result.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq)]
pub struct Empty {}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[aliases(
    VillaNumberEnvelope = ApiResponse<VillaNumberDto>,
    VillaNumberListEnvelope = ApiResponse<Vec<VillaNumberDto>>,
    EmptyEnvelope = ApiResponse<Empty>
)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub is_success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error_messages: Vec<String>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            status_code: 200,
            is_success: true,
            result: None,
            error_messages: Vec::new(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the status for the current branch.
    ///
    /// Anything outside 2xx marks the envelope as failed.
    pub fn set_status(&mut self, status_code: u16) {
        self.status_code = status_code;
        if !(200..300).contains(&status_code) {
            self.is_success = false;
        }
    }

    pub fn set_result(&mut self, status_code: u16, result: T) {
        self.set_status(status_code);
        self.result = Some(result);
    }

    /// Record an unexpected fault.
    ///
    /// Only the success flag and error list change; the status code keeps
    /// whatever value the handler set before the fault.
    pub fn record_fault(&mut self, description: impl Into<String>) {
        self.is_success = false;
        self.error_messages = vec![description.into()];
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.set_status(status_code);
        self
    }

    pub fn with_result(mut self, status_code: u16, result: T) -> Self {
        self.set_result(status_code, result);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_envelope_is_success_without_payload() {
        let envelope: ApiResponse<Empty> = ApiResponse::new();
        assert_eq!(envelope.status_code, 200);
        assert!(envelope.is_success);
        assert!(envelope.result.is_none());
        assert!(envelope.error_messages.is_empty());
    }

    #[test]
    fn non_success_status_clears_flag() {
        let envelope: ApiResponse<Empty> = ApiResponse::new().with_status(404);
        assert_eq!(envelope.status_code, 404);
        assert!(!envelope.is_success);

        let created = ApiResponse::new().with_result(201, 7);
        assert!(created.is_success);
        assert_eq!(created.result, Some(7));
    }

    #[test]
    fn fault_keeps_prior_status_and_replaces_messages() {
        let mut envelope: ApiResponse<Empty> = ApiResponse::new();
        envelope.error_messages.push("stale".to_string());
        envelope.record_fault("connection reset");
        assert_eq!(envelope.status_code, 200);
        assert!(!envelope.is_success);
        assert_eq!(envelope.error_messages, vec!["connection reset".to_string()]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let envelope: ApiResponse<Empty> = ApiResponse::new().with_status(400);
        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "statusCode": 400,
                "isSuccess": false,
                "result": null,
                "errorMessages": []
            })
        );
    }
}
