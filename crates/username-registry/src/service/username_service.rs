//! Username Registry Service
//!
//! Orchestrates canonicalization, the cache-aside lookup path and durable
//! registration on top of the adaptive registry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::{
    canonicalize, registry_key, suggest, AdaptiveRegistry, Canonicalization, RegistryConfig,
};
use crate::error::RegistryError;
use crate::metrics::{LookupSource, Metrics, MetricsRecorder};
use crate::ports::{
    AvailabilityResult, CacheStore, GenerationStore, ProfileDirectory, RegistrationResult,
    ServiceStats, UsernameRegistryApi,
};

const CACHE_TAKEN: &str = "true";
const CACHE_FREE: &str = "false";

/// Username registry service
///
/// Implements the `UsernameRegistryApi` port using injected dependencies.
pub struct UsernameRegistryService {
    registry: RwLock<AdaptiveRegistry>,
    /// Serializes add + persist so saves never interleave
    writer: Mutex<()>,
    cache: Arc<dyn CacheStore>,
    profiles: Arc<dyn ProfileDirectory>,
    store: Arc<dyn GenerationStore>,
    metrics: Arc<dyn MetricsRecorder>,
    /// Profile updates spawned by registrations and not yet drained
    notifications: Mutex<Vec<JoinHandle<()>>>,
    config: RegistryConfig,
}

impl UsernameRegistryService {
    pub fn new(
        registry: AdaptiveRegistry,
        config: RegistryConfig,
        cache: Arc<dyn CacheStore>,
        profiles: Arc<dyn ProfileDirectory>,
        store: Arc<dyn GenerationStore>,
    ) -> Self {
        Self::with_metrics(
            registry,
            config,
            cache,
            profiles,
            store,
            Arc::new(Metrics::new()),
        )
    }

    /// Create with a custom metrics recorder
    pub fn with_metrics(
        registry: AdaptiveRegistry,
        config: RegistryConfig,
        cache: Arc<dyn CacheStore>,
        profiles: Arc<dyn ProfileDirectory>,
        store: Arc<dyn GenerationStore>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            registry: RwLock::new(registry),
            writer: Mutex::new(()),
            cache,
            profiles,
            store,
            metrics,
            notifications: Mutex::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn cache_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.cache_prefix, key)
    }

    /// Cached membership for `cache_key`; `None` on miss, error or junk value
    async fn cached_membership(&self, cache_key: &str) -> Option<bool> {
        match self.cache.get(cache_key).await {
            Ok(Some(value)) if value == CACHE_TAKEN => Some(true),
            Ok(Some(value)) if value == CACHE_FREE => Some(false),
            Ok(Some(value)) => {
                warn!(key = cache_key, value = %value, "Ignoring unexpected cache value");
                None
            }
            Ok(None) => None,
            Err(e) => {
                self.metrics.record_cache_error();
                warn!(key = cache_key, error = %e, "Cache read failed, using registry");
                None
            }
        }
    }

    async fn cache_membership(&self, cache_key: &str, taken: bool, ttl: Duration) {
        let value = if taken { CACHE_TAKEN } else { CACHE_FREE };
        if let Err(e) = self.cache.set(cache_key, value, ttl).await {
            self.metrics.record_cache_error();
            warn!(key = cache_key, error = %e, "Cache write failed");
        }
    }

    async fn suggestion_for(&self, canonical: &str) -> String {
        if !self.config.verify_suggestions {
            return suggest(canonical, &mut rand::thread_rng());
        }

        let registry = self.registry.read().await;
        first_free_suggestion(
            &registry,
            canonical,
            self.config.suggestion_attempts,
            &mut rand::thread_rng(),
        )
    }

    /// Wait for every outstanding profile update.
    ///
    /// Registration does not block on the profile directory. Short-lived
    /// callers (one-shot CLI commands) call this before the runtime shuts down
    /// so the update is not dropped.
    pub async fn drain_notifications(&self) {
        let pending = std::mem::take(&mut *self.notifications.lock().await);
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "Profile update task did not complete");
            }
        }
    }

    async fn notify_profile(&self, identity: &str, display_name: &str) {
        let profiles = Arc::clone(&self.profiles);
        let identity = identity.to_string();
        let display_name = display_name.to_string();

        let handle = tokio::spawn(async move {
            if let Err(e) = profiles.set_display_name(&identity, &display_name).await {
                warn!(
                    identity = %identity,
                    display_name = %display_name,
                    error = %e,
                    "Profile update failed after registration"
                );
            }
        });

        let mut pending = self.notifications.lock().await;
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }
}

/// Draw up to `attempts` suggestions, returning the first the registry
/// does not contain (or the last one drawn)
fn first_free_suggestion<R: Rng>(
    registry: &AdaptiveRegistry,
    canonical: &str,
    attempts: usize,
    rng: &mut R,
) -> String {
    let mut candidate = suggest(canonical, rng);
    for _ in 1..attempts {
        if !registry.contains(registry_key(&candidate).as_bytes()) {
            break;
        }
        candidate = suggest(canonical, rng);
    }
    candidate
}

#[async_trait]
impl UsernameRegistryApi for UsernameRegistryService {
    async fn check_availability(&self, raw_name: &str) -> AvailabilityResult {
        let canonical = match canonicalize(raw_name, self.config.max_name_length) {
            Canonicalization::Canonicalized(name) => name,
            Canonicalization::Rejected(reason) => {
                debug!(raw = raw_name, reason = %reason, "Availability check rejected");
                return AvailabilityResult::rejected(reason.to_string(), None);
            }
        };

        if canonical != raw_name {
            return AvailabilityResult::rejected(
                format!("username would be registered as \"{}\"", canonical),
                Some(canonical),
            );
        }

        let key = registry_key(&canonical);
        let cache_key = self.cache_key(&key);
        let start = Instant::now();

        let (taken, source) = match self.cached_membership(&cache_key).await {
            Some(taken) => (taken, LookupSource::Cache),
            None => {
                let taken = self.registry.read().await.contains(key.as_bytes());
                self.cache_membership(&cache_key, taken, self.config.lookup_ttl())
                    .await;
                (taken, LookupSource::Registry)
            }
        };
        self.metrics.record_lookup(start.elapsed(), source);
        debug!(name = %canonical, taken, source = ?source, "Availability checked");

        if taken {
            AvailabilityResult::taken(self.suggestion_for(&canonical).await)
        } else {
            AvailabilityResult::available()
        }
    }

    async fn register_name(
        &self,
        raw_name: &str,
        identity: &str,
    ) -> Result<RegistrationResult, RegistryError> {
        let canonical = match canonicalize(raw_name, self.config.max_name_length) {
            Canonicalization::Canonicalized(name) => name,
            Canonicalization::Rejected(reason) => {
                self.metrics.record_rejection();
                debug!(raw = raw_name, reason = %reason, "Registration rejected");
                return Ok(RegistrationResult::rejected(reason.to_string()));
            }
        };
        let key = registry_key(&canonical);

        let _writer = self.writer.lock().await;

        let mut staged = self.registry.read().await.stage();
        let growth = staged.add(key.as_bytes())?;

        if let Err(e) = self
            .store
            .save_all(staged.generations(), staged.backing_path())
            .await
        {
            self.metrics.record_persistence_failure();
            error!(
                name = %canonical,
                path = %staged.backing_path().display(),
                error = %e,
                "Failed to persist registration"
            );
            return Err(RegistryError::Persistence(e.to_string()));
        }

        self.registry.write().await.commit(staged);
        self.metrics.record_registration();

        if let Some(event) = growth {
            self.metrics.record_growth();
            info!(
                previous_size_bits = event.previous_size_bits,
                previous_inserted = event.previous_inserted,
                previous_fpr = event.previous_fpr,
                new_size_bits = event.new_size_bits,
                new_hash_count = event.new_hash_count,
                generations = event.generation_count,
                "Registry grew a new generation"
            );
        }

        self.cache_membership(&self.cache_key(&key), true, self.config.registration_ttl())
            .await;
        self.notify_profile(identity, &canonical).await;

        debug!(name = %canonical, identity, "Username registered");
        Ok(RegistrationResult::registered(canonical))
    }

    async fn stats(&self) -> ServiceStats {
        ServiceStats {
            registry: self.registry.read().await.stats(),
            metrics: self.metrics.snapshot(),
        }
    }
}
