//! # Registry Container
//!
//! Composition root: owns the configuration, bootstraps the registry from disk
//! and wires the service to its adapters. Nothing here is process-global; the
//! binary builds one container and hands out references.

pub mod config;

use std::sync::Arc;

use tracing::info;
use username_registry::{
    open_registry, FileGenerationStore, InMemoryCache, InMemoryProfileDirectory, Metrics,
    RegistryConfig, RegistryError, RegistryRequestHandler, UsernameRegistryService,
};

pub use config::{load_config, load_config_from, ConfigOverrides};

/// Initialized registry service and its adapters.
pub struct RegistryContainer {
    pub config: RegistryConfig,
    pub service: Arc<UsernameRegistryService>,
    pub profiles: Arc<InMemoryProfileDirectory>,
    pub metrics: Arc<Metrics>,
}

impl RegistryContainer {
    /// Bootstrap the registry from `config.data_dir` and wire the service.
    pub async fn build(config: RegistryConfig) -> Result<Self, RegistryError> {
        let store = Arc::new(FileGenerationStore::new());
        let registry = open_registry(&config, store.as_ref()).await?;

        let cache = Arc::new(InMemoryCache::new(config.cache_capacity));
        let profiles = Arc::new(InMemoryProfileDirectory::new());
        let metrics = Arc::new(Metrics::new());

        let service = Arc::new(UsernameRegistryService::with_metrics(
            registry,
            config.clone(),
            cache,
            profiles.clone(),
            store,
            metrics.clone(),
        ));

        info!(data_dir = %config.data_dir.display(), "Registry container initialized");
        Ok(Self {
            config,
            service,
            profiles,
            metrics,
        })
    }

    /// Request handler bound to this container's service.
    pub fn handler(&self) -> RegistryRequestHandler<UsernameRegistryService> {
        RegistryRequestHandler::new(Arc::clone(&self.service))
    }
}
