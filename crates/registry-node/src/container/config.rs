//! # Node Configuration
//!
//! Layering, lowest to highest precedence:
//!
//! 1. `RegistryConfig::default()`
//! 2. `UR_*` environment variables
//! 3. Command-line flags (`ConfigOverrides`)
//!
//! Unparseable environment values are logged and ignored; the merged result is
//! validated once at the end.

use std::path::PathBuf;

use tracing::{info, warn};
use username_registry::{RegistryConfig, RegistryError};

pub const ENV_DATA_DIR: &str = "UR_DATA_DIR";
pub const ENV_EXPECTED_ITEMS: &str = "UR_EXPECTED_ITEMS";
pub const ENV_TARGET_FPR: &str = "UR_TARGET_FPR";
pub const ENV_GROWTH_FACTOR: &str = "UR_GROWTH_FACTOR";
pub const ENV_CACHE_PREFIX: &str = "UR_CACHE_PREFIX";
pub const ENV_VERIFY_SUGGESTIONS: &str = "UR_VERIFY_SUGGESTIONS";

/// Load configuration from the process environment.
pub fn load_config() -> RegistryConfig {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> RegistryConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RegistryConfig::default();

    if let Some(dir) = lookup(ENV_DATA_DIR) {
        info!(data_dir = %dir, "Loaded data directory from environment");
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(items) = parse_var(&lookup, ENV_EXPECTED_ITEMS) {
        config.expected_items = items;
    }
    if let Some(fpr) = parse_var(&lookup, ENV_TARGET_FPR) {
        config.target_fpr = fpr;
    }
    if let Some(factor) = parse_var(&lookup, ENV_GROWTH_FACTOR) {
        config.growth_factor = factor;
    }
    if let Some(prefix) = lookup(ENV_CACHE_PREFIX) {
        config.cache_prefix = prefix;
    }
    if let Some(verify) = lookup(ENV_VERIFY_SUGGESTIONS) {
        match parse_flag(&verify) {
            Some(flag) => config.verify_suggestions = flag,
            None => warn!(
                "{} must be true/false/1/0, got {:?}",
                ENV_VERIFY_SUGGESTIONS, verify
            ),
        }
    }

    config
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Values supplied on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub expected_items: Option<usize>,
    pub target_fpr: Option<f64>,
    pub growth_factor: Option<f64>,
    pub cache_prefix: Option<String>,
    pub verify_suggestions: Option<bool>,
}

impl ConfigOverrides {
    /// Apply the overrides on top of `config` and validate the result.
    pub fn apply(self, mut config: RegistryConfig) -> Result<RegistryConfig, RegistryError> {
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(items) = self.expected_items {
            config.expected_items = items;
        }
        if let Some(fpr) = self.target_fpr {
            config.target_fpr = fpr;
        }
        if let Some(factor) = self.growth_factor {
            config.growth_factor = factor;
        }
        if let Some(prefix) = self.cache_prefix {
            config.cache_prefix = prefix;
        }
        if let Some(verify) = self.verify_suggestions {
            config.verify_suggestions = verify;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_environment_gives_defaults() {
        assert_eq!(load_config_from(env(&[])), RegistryConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_config_from(env(&[
            (ENV_DATA_DIR, "/srv/names"),
            (ENV_EXPECTED_ITEMS, "5000"),
            (ENV_TARGET_FPR, "0.05"),
            (ENV_GROWTH_FACTOR, "1.5"),
            (ENV_CACHE_PREFIX, "handle"),
            (ENV_VERIFY_SUGGESTIONS, "true"),
        ]));

        assert_eq!(config.data_dir, PathBuf::from("/srv/names"));
        assert_eq!(config.expected_items, 5000);
        assert_eq!(config.target_fpr, 0.05);
        assert_eq!(config.growth_factor, 1.5);
        assert_eq!(config.cache_prefix, "handle");
        assert!(config.verify_suggestions);
    }

    #[test]
    fn test_unparseable_values_are_ignored() {
        let config = load_config_from(env(&[
            (ENV_EXPECTED_ITEMS, "lots"),
            (ENV_TARGET_FPR, ""),
            (ENV_VERIFY_SUGGESTIONS, "maybe"),
        ]));

        let defaults = RegistryConfig::default();
        assert_eq!(config.expected_items, defaults.expected_items);
        assert_eq!(config.target_fpr, defaults.target_fpr);
        assert!(!config.verify_suggestions);
    }

    #[test]
    fn test_cli_overrides_win_over_environment() {
        let from_env = load_config_from(env(&[(ENV_TARGET_FPR, "0.05"), (ENV_CACHE_PREFIX, "env")]));

        let config = ConfigOverrides {
            target_fpr: Some(0.02),
            ..Default::default()
        }
        .apply(from_env)
        .unwrap();

        assert_eq!(config.target_fpr, 0.02);
        assert_eq!(config.cache_prefix, "env", "unset flags keep the env value");
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let result = ConfigOverrides {
            growth_factor: Some(0.5),
            ..Default::default()
        }
        .apply(RegistryConfig::default());

        assert!(matches!(result, Err(RegistryError::InvalidConfig(_))));
    }
}
