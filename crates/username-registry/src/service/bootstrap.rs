//! Registry bootstrap
//!
//! Builds the in-memory registry from the generation files in the data
//! directory. Boot never fails on bad file contents: an unreadable active file
//! is replaced by a fresh one and unreadable historical files are skipped.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::adapters::generation_file::{
    discover, generation_file_name, now_millis, parse_generation_timestamp,
};
use crate::domain::{AdaptiveRegistry, RegistryConfig};
use crate::error::RegistryError;
use crate::ports::GenerationStore;

/// Load or create the registry described by `config`
pub async fn open_registry(
    config: &RegistryConfig,
    store: &dyn GenerationStore,
) -> Result<AdaptiveRegistry, RegistryError> {
    config.validate()?;
    let found = discover(&config.data_dir).await?;

    let loaded = match &found.active {
        Some(path) => load_active(config, store, path).await,
        None => None,
    };

    let mut registry = match loaded {
        Some(registry) => registry,
        None => create_fresh(config, store, found.active.as_deref()).await?,
    };

    for path in &found.historical {
        match store.load_all(path).await {
            Ok(generations) => registry.attach_historical(generations),
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "Skipping unreadable historical generation file"
            ),
        }
    }

    let stats = registry.stats();
    info!(
        path = %registry.backing_path().display(),
        generations = stats.generations,
        historical = stats.historical_generations,
        inserted = stats.total_inserted,
        "Username registry ready"
    );
    Ok(registry)
}

async fn load_active(
    config: &RegistryConfig,
    store: &dyn GenerationStore,
    path: &Path,
) -> Option<AdaptiveRegistry> {
    let result = match store.load_all(path).await {
        Ok(generations) => AdaptiveRegistry::from_generations(
            generations,
            config.target_fpr,
            config.growth_factor,
            path,
        ),
        Err(e) => Err(e),
    };

    match result {
        Ok(registry) => Some(registry),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Active generation file unreadable, starting a fresh registry"
            );
            None
        }
    }
}

/// Build an empty registry and persist it under a new, newest timestamp
async fn create_fresh(
    config: &RegistryConfig,
    store: &dyn GenerationStore,
    previous_active: Option<&Path>,
) -> Result<AdaptiveRegistry, RegistryError> {
    let previous_ts = previous_active
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .and_then(parse_generation_timestamp);
    let timestamp = match previous_ts {
        Some(ts) => now_millis().max(ts.saturating_add(1)),
        None => now_millis(),
    };

    let path: PathBuf = config.data_dir.join(generation_file_name(timestamp));
    let registry = AdaptiveRegistry::new(
        config.expected_items,
        config.target_fpr,
        config.growth_factor,
        &path,
    )?;
    store.save_all(registry.generations(), &path).await?;

    info!(
        path = %path.display(),
        size_bits = registry.active().size_bits(),
        hash_count = registry.active().hash_count(),
        "Created new generation file"
    );
    Ok(registry)
}
