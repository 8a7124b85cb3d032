//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Hash functions (MurmurHash3 double hashing)
//! - Packed bit set
//! - Single-generation Bloom filter and its binary codec
//! - Parameter calculations
//! - Adaptive multi-generation registry
//! - Username canonicalization and suggestions
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod adaptive_registry;
pub mod bitset;
pub mod bloom_filter;
pub mod canonical;
pub mod config;
pub mod hash_functions;
pub mod parameters;
pub mod suggestion;

pub use adaptive_registry::{AdaptiveRegistry, GrowthEvent, RegistryStats};
pub use bitset::BitSet;
pub use bloom_filter::{BloomFilter, HEADER_LEN};
pub use canonical::{canonicalize, registry_key, Canonicalization, RejectReason};
pub use config::{RegistryConfig, RegistryConfigBuilder};
pub use parameters::{calculate_optimal_parameters, BloomFilterParams};
pub use suggestion::suggest;
