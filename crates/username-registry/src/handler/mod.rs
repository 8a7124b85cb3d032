//! Handler Layer
//!
//! Validates inbound requests against payload bounds and dispatches them to
//! the registry service.

pub mod request_handler;

pub use request_handler::{RegistryRequestHandler, MAX_IDENTITY_BYTES, MAX_NAME_BYTES};
