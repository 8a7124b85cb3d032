//! Response Messages
//!
//! One JSON object per response, discriminated by `type`.

use serde::{Deserialize, Serialize};

use crate::ports::{AvailabilityResult, RegistrationResult, ServiceStats};

/// Outbound registry response
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryResponse {
    Availability(AvailabilityResult),
    Registration(RegistrationResult),
    Stats(ServiceStats),
    Error(ErrorResponse),
}

/// Error response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (see [`error_codes`])
    pub code: u32,
    /// Error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ErrorResponse> for RegistryResponse {
    fn from(error: ErrorResponse) -> Self {
        RegistryResponse::Error(error)
    }
}

/// Error codes for registry requests
pub mod error_codes {
    /// Request line is not a valid request
    pub const MALFORMED_REQUEST: u32 = 4000;
    /// Name exceeds the payload bound
    pub const PAYLOAD_TOO_LARGE: u32 = 4001;
    /// Identity empty or too long
    pub const INVALID_IDENTITY: u32 = 4002;
    /// Registration could not be made durable
    pub const PERSISTENCE_FAILED: u32 = 5001;
    /// Internal error
    pub const INTERNAL_ERROR: u32 = 5099;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_availability_serializes_with_type_tag() {
        let response = RegistryResponse::Availability(AvailabilityResult::taken("alicedev".into()));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "type": "availability",
                "available": false,
                "message": "taken",
                "suggestion": "alicedev"
            })
        );
    }

    #[test]
    fn test_available_omits_suggestion() {
        let response = RegistryResponse::Availability(AvailabilityResult::available());

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("suggestion").is_none());
    }

    #[test]
    fn test_error_serialization() {
        let response: RegistryResponse =
            ErrorResponse::new(error_codes::PAYLOAD_TOO_LARGE, "name too large").into();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"type": "error", "code": 4001, "message": "name too large"})
        );
    }
}
