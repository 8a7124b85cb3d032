//! Request handler for the username registry
//!
//! Enforces payload bounds before any canonicalization work:
//! - Reject names longer than 256 bytes
//! - Reject empty identities or identities longer than 128 bytes

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{RegistryError, RequestError};
use crate::events::{error_codes, ErrorResponse, RegistryRequest, RegistryResponse};
use crate::ports::UsernameRegistryApi;

/// Largest raw name accepted, in bytes
pub const MAX_NAME_BYTES: usize = 256;

/// Largest identity accepted, in bytes
pub const MAX_IDENTITY_BYTES: usize = 128;

/// Request handler for the registry service
pub struct RegistryRequestHandler<S: UsernameRegistryApi + ?Sized> {
    service: Arc<S>,
}

impl<S: UsernameRegistryApi + ?Sized> RegistryRequestHandler<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Validate the raw name of a check or register request
    pub fn validate_name(&self, name: &str) -> Result<(), RequestError> {
        if name.len() > MAX_NAME_BYTES {
            return Err(RequestError::NameTooLarge {
                length: name.len(),
                max: MAX_NAME_BYTES,
            });
        }
        Ok(())
    }

    /// Validate the identity of a register request
    pub fn validate_identity(&self, identity: &str) -> Result<(), RequestError> {
        if identity.is_empty() || identity.len() > MAX_IDENTITY_BYTES {
            return Err(RequestError::InvalidIdentity {
                length: identity.len(),
                max: MAX_IDENTITY_BYTES,
            });
        }
        Ok(())
    }

    /// Validate and dispatch one request
    pub async fn handle(&self, request: RegistryRequest) -> RegistryResponse {
        match request {
            RegistryRequest::Check { name } => {
                if let Err(e) = self.validate_name(&name) {
                    return request_error(e);
                }
                RegistryResponse::Availability(self.service.check_availability(&name).await)
            }
            RegistryRequest::Register { name, identity } => {
                if let Err(e) = self
                    .validate_name(&name)
                    .and_then(|_| self.validate_identity(&identity))
                {
                    return request_error(e);
                }
                match self.service.register_name(&name, &identity).await {
                    Ok(result) => RegistryResponse::Registration(result),
                    Err(e) => registry_error(e),
                }
            }
            RegistryRequest::Stats => RegistryResponse::Stats(self.service.stats().await),
        }
    }

    /// Parse one JSON request line and handle it
    pub async fn handle_line(&self, line: &str) -> RegistryResponse {
        match serde_json::from_str::<RegistryRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => request_error(RequestError::Malformed(e.to_string())),
        }
    }
}

fn request_error(error: RequestError) -> RegistryResponse {
    debug!(error = %error, "Rejected request");
    let code = match error {
        RequestError::Malformed(_) => error_codes::MALFORMED_REQUEST,
        RequestError::NameTooLarge { .. } => error_codes::PAYLOAD_TOO_LARGE,
        RequestError::InvalidIdentity { .. } => error_codes::INVALID_IDENTITY,
    };
    ErrorResponse::new(code, error.to_string()).into()
}

fn registry_error(error: RegistryError) -> RegistryResponse {
    warn!(error = %error, "Registration failed");
    let code = match error {
        RegistryError::Persistence(_) => error_codes::PERSISTENCE_FAILED,
        _ => error_codes::INTERNAL_ERROR,
    };
    ErrorResponse::new(code, error.to_string()).into()
}
