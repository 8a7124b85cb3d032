//! Inbound Ports (Driving Ports)
//!
//! The API external collaborators (web layer, CLI, request loop) use to talk
//! to the registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::RegistryStats;
use crate::error::RegistryError;
use crate::metrics::MetricsSnapshot;

/// Result of an availability check
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    /// Whether the name can be registered
    pub available: bool,
    /// Human-readable status ("available", "taken", or a rejection reason)
    pub message: String,
    /// Alternative name, present when the name is taken or not canonical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl AvailabilityResult {
    pub fn available() -> Self {
        Self {
            available: true,
            message: "available".to_string(),
            suggestion: None,
        }
    }

    pub fn taken(suggestion: String) -> Self {
        Self {
            available: false,
            message: "taken".to_string(),
            suggestion: Some(suggestion),
        }
    }

    pub fn rejected(message: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            available: false,
            message: message.into(),
            suggestion,
        }
    }
}

/// Result of a registration attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub success: bool,
    /// Canonical form actually stored (case preserved)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,
    pub message: String,
}

impl RegistrationResult {
    pub fn registered(canonical_name: String) -> Self {
        Self {
            success: true,
            canonical_name: Some(canonical_name),
            message: "registered".to_string(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            canonical_name: None,
            message: message.into(),
        }
    }
}

/// Combined registry and service statistics
#[derive(Clone, Debug, Serialize)]
pub struct ServiceStats {
    pub registry: RegistryStats,
    pub metrics: MetricsSnapshot,
}

/// Primary username registry API (Driving Port)
#[async_trait]
pub trait UsernameRegistryApi: Send + Sync {
    /// Check whether a raw username is free to register
    ///
    /// Non-canonical input is rejected with the canonical form as suggestion;
    /// it is never silently substituted.
    async fn check_availability(&self, raw_name: &str) -> AvailabilityResult;

    /// Register a raw username for `identity`
    ///
    /// Canonicalization failures are reported in the result. `Err` means the
    /// add could not be made durable.
    async fn register_name(
        &self,
        raw_name: &str,
        identity: &str,
    ) -> Result<RegistrationResult, RegistryError>;

    /// Current registry statistics
    async fn stats(&self) -> ServiceStats;
}
