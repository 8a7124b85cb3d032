//! Request Messages
//!
//! One JSON object per request, discriminated by `op`:
//!
//! ```json
//! {"op": "check", "name": "alice"}
//! {"op": "register", "name": "alice", "identity": "user-42"}
//! {"op": "stats"}
//! ```

use serde::{Deserialize, Serialize};

/// Inbound registry request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryRequest {
    /// Availability check for a raw username
    Check { name: String },
    /// Register a raw username for an identity
    Register {
        name: String,
        /// Profile identity that receives the canonical display name
        identity: String,
    },
    /// Registry and metrics statistics
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_requests() {
        let check: RegistryRequest = serde_json::from_str(r#"{"op":"check","name":"alice"}"#).unwrap();
        assert_eq!(
            check,
            RegistryRequest::Check {
                name: "alice".to_string()
            }
        );

        let register: RegistryRequest =
            serde_json::from_str(r#"{"op":"register","name":"Bob","identity":"u-1"}"#).unwrap();
        assert_eq!(
            register,
            RegistryRequest::Register {
                name: "Bob".to_string(),
                identity: "u-1".to_string()
            }
        );

        let stats: RegistryRequest = serde_json::from_str(r#"{"op":"stats"}"#).unwrap();
        assert_eq!(stats, RegistryRequest::Stats);
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let result = serde_json::from_str::<RegistryRequest>(r#"{"op":"delete","name":"x"}"#);
        assert!(result.is_err());
    }
}
