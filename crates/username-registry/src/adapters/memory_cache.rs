//! In-process TTL cache
//!
//! Bounded LRU with a per-entry deadline. Stands in for an external
//! key/value store (e.g. Redis) behind the same `CacheStore` port.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;

use crate::error::CacheError;
use crate::ports::CacheStore;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// LRU-bounded cache with per-key expiry
pub struct InMemoryCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl InMemoryCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of stored entries, expired ones included until touched
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().await.put(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_live_value() {
        let cache = InMemoryCache::new(16);
        cache
            .set("username:alice", "true", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get("username:alice").await.unwrap(),
            Some("true".to_string())
        );
        assert_eq!(cache.get("username:bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_value_and_ttl() {
        let cache = InMemoryCache::new(16);
        cache.set("k", "false", Duration::ZERO).await.unwrap();
        cache.set("k", "true", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some("true".to_string()));
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let cache = InMemoryCache::new(16);
        cache.set("k", "true", Duration::from_millis(20)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[test]
    fn test_capacity_bounds_entries() {
        tokio_test::block_on(async {
            let cache = InMemoryCache::new(2);
            for key in ["a", "b", "c"] {
                cache.set(key, "true", Duration::from_secs(60)).await.unwrap();
            }

            assert_eq!(cache.len().await, 2);
            assert_eq!(cache.get("a").await.unwrap(), None, "oldest entry evicted");
        });
    }
}
