//! Service Layer
//!
//! Contains the application service that orchestrates domain logic and
//! coordinates with external dependencies via ports, plus the bootstrap that
//! rebuilds the registry from disk.

pub mod bootstrap;
pub mod username_service;

pub use bootstrap::open_registry;
pub use username_service::UsernameRegistryService;
