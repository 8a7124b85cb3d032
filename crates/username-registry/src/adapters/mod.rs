//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the driven ports.
//!
//! ## Adapters
//!
//! - `FileGenerationStore` - Generation files on local disk, plus directory discovery
//! - `InMemoryCache` - LRU-bounded TTL cache
//! - `InMemoryProfileDirectory` - Display-name sink

pub mod generation_file;
pub mod memory_cache;
pub mod profile_directory;

pub use generation_file::{discover, DiscoveredFiles, FileGenerationStore};
pub use memory_cache::InMemoryCache;
pub use profile_directory::InMemoryProfileDirectory;
