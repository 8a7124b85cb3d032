//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports (outbound) - cache, profile store, generation persistence

pub mod inbound;
pub mod outbound;

pub use inbound::{AvailabilityResult, RegistrationResult, ServiceStats, UsernameRegistryApi};
pub use outbound::{CacheStore, GenerationStore, ProfileDirectory};
