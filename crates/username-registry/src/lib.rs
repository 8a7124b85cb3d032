//! # Username Registry
//!
//! Adaptive Bloom filter registry answering "is this username taken?" with a
//! bounded false-positive rate, persisted as binary generation files and
//! fronted by a short-TTL cache.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `BloomFilter`: One generation, with its binary codec
//!   - `AdaptiveRegistry`: Generation list with FPR-driven growth
//!   - `canonicalize` / `suggest`: Username normalization and alternatives
//!   - `RegistryConfig`: Configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `UsernameRegistryApi`: Driving port (inbound API)
//!   - `CacheStore`, `ProfileDirectory`, `GenerationStore`: Driven ports
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `FileGenerationStore`: `usernames-<millis>.bloom` files
//!   - `InMemoryCache`: LRU cache with per-key TTL
//!   - `InMemoryProfileDirectory`: Display names per identity
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `UsernameRegistryService`: Implements `UsernameRegistryApi`
//!   - `open_registry`: Rebuilds the registry from the data directory
//!
//! - **Handler Layer** (`handler/`): Payload bounds and dispatch
//!
//! - **Events Layer** (`events/`): Request/response wire types
//!
//! ## Invariants
//!
//! - No false negatives: a registered name is reported taken across any
//!   number of growth events and restarts
//! - Only the newest generation is written; older ones are read-only
//! - A registration is reported successful only once it is on disk
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use username_registry::{
//!     open_registry, FileGenerationStore, InMemoryCache, InMemoryProfileDirectory,
//!     RegistryConfig, UsernameRegistryApi, UsernameRegistryService,
//! };
//!
//! let config = RegistryConfig::default();
//! let store = Arc::new(FileGenerationStore::new());
//! let registry = open_registry(&config, store.as_ref()).await?;
//!
//! let service = UsernameRegistryService::new(
//!     registry,
//!     config.clone(),
//!     Arc::new(InMemoryCache::new(config.cache_capacity)),
//!     Arc::new(InMemoryProfileDirectory::new()),
//!     store,
//! );
//!
//! service.register_name("Alice", "user-1").await?;
//! assert!(!service.check_availability("alice").await.available);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{FileGenerationStore, InMemoryCache, InMemoryProfileDirectory};
pub use domain::{
    canonicalize, AdaptiveRegistry, BloomFilter, Canonicalization, RegistryConfig,
    RegistryConfigBuilder, RejectReason,
};
pub use error::{CacheError, CodecError, ProfileError, RegistryError, RequestError};
pub use events::{RegistryRequest, RegistryResponse};
pub use handler::RegistryRequestHandler;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{
    AvailabilityResult, CacheStore, GenerationStore, ProfileDirectory, RegistrationResult,
    ServiceStats, UsernameRegistryApi,
};
pub use service::{open_registry, UsernameRegistryService};
