//! Outbound Ports (Driven Ports)
//!
//! Dependencies the registry needs from the outside world: a TTL cache, the
//! profile store that receives display names, and generation persistence.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::BloomFilter;
use crate::error::{CacheError, ProfileError, RegistryError};

/// Key/value cache with per-key TTL (Driven Port)
///
/// Best-effort accelerator, never a source of truth. Values are the literal
/// strings `"true"` / `"false"`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live value, `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value that expires after `ttl`, overwriting any existing entry
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Profile / display-name store notified after a registration (Driven Port)
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Record `display_name` (canonical, case preserved) for `identity`
    async fn set_display_name(&self, identity: &str, display_name: &str)
        -> Result<(), ProfileError>;
}

/// Persistence strategy for Bloom filter generations (Driven Port)
///
/// The shipped strategy rewrites every generation on each save; an
/// append-only log can implement the same trait.
#[async_trait]
pub trait GenerationStore: Send + Sync {
    /// Persist `generations` (oldest first) to `path`, replacing its contents
    async fn save_all(&self, generations: &[BloomFilter], path: &Path)
        -> Result<(), RegistryError>;

    /// Load every generation stored at `path`, in file order
    async fn load_all(&self, path: &Path) -> Result<Vec<BloomFilter>, RegistryError>;
}
