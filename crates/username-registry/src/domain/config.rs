//! Registry configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use username_registry::domain::RegistryConfigBuilder;
//!
//! let config = RegistryConfigBuilder::new()
//!     .data_dir("/var/lib/usernames")
//!     .target_fpr(0.01)
//!     .expected_items(50_000)
//!     .build()?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// TTL for caching a lookup result (3 minutes)
pub const DEFAULT_LOOKUP_TTL_SECS: u64 = 180;

/// TTL for caching a fresh registration (15 minutes)
pub const DEFAULT_REGISTRATION_TTL_SECS: u64 = 900;

/// Username registry configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    /// Directory holding `usernames-<millis>.bloom` generation files
    pub data_dir: PathBuf,
    /// Items the first generation is sized for
    pub expected_items: usize,
    /// Estimated FPR above which a new generation is appended
    pub target_fpr: f64,
    /// Size multiplier applied at each growth event
    pub growth_factor: f64,
    /// Namespace for cache keys (`<prefix>:<name>`)
    pub cache_prefix: String,
    /// TTL for caching lookup results
    pub lookup_ttl_secs: u64,
    /// TTL for caching a fresh registration
    pub registration_ttl_secs: u64,
    /// Maximum entries held by the in-process cache
    pub cache_capacity: usize,
    /// Optional cap on canonical username length; `None` accepts any length
    #[serde(default)]
    pub max_name_length: Option<usize>,
    /// Re-check suggestions against the registry before returning them
    pub verify_suggestions: bool,
    /// Candidates tried when `verify_suggestions` is on
    pub suggestion_attempts: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/usernames"),
            expected_items: 10_000,
            target_fpr: 0.01,
            growth_factor: 2.0,
            cache_prefix: "username".to_string(),
            lookup_ttl_secs: DEFAULT_LOOKUP_TTL_SECS,
            registration_ttl_secs: DEFAULT_REGISTRATION_TTL_SECS,
            cache_capacity: 100_000,
            max_name_length: None,
            verify_suggestions: false,
            suggestion_attempts: 5,
        }
    }
}

impl RegistryConfig {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.target_fpr <= 0.0 || self.target_fpr >= 1.0 || self.target_fpr.is_nan() {
            return Err(RegistryError::InvalidConfig(format!(
                "target_fpr {} must be in (0, 1)",
                self.target_fpr
            )));
        }

        if self.growth_factor <= 1.0 || !self.growth_factor.is_finite() {
            return Err(RegistryError::InvalidConfig(format!(
                "growth_factor {} must be > 1",
                self.growth_factor
            )));
        }

        if self.expected_items == 0 {
            return Err(RegistryError::InvalidConfig(
                "expected_items cannot be 0".to_string(),
            ));
        }

        if self.cache_prefix.is_empty() {
            return Err(RegistryError::InvalidConfig(
                "cache_prefix cannot be empty".to_string(),
            ));
        }

        if self.cache_capacity == 0 {
            return Err(RegistryError::InvalidConfig(
                "cache_capacity cannot be 0".to_string(),
            ));
        }

        if self.max_name_length == Some(0) {
            return Err(RegistryError::InvalidConfig(
                "max_name_length cannot be 0".to_string(),
            ));
        }

        if self.suggestion_attempts == 0 {
            return Err(RegistryError::InvalidConfig(
                "suggestion_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn lookup_ttl(&self) -> Duration {
        Duration::from_secs(self.lookup_ttl_secs)
    }

    pub fn registration_ttl(&self) -> Duration {
        Duration::from_secs(self.registration_ttl_secs)
    }

    /// Builder-style method to set the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Builder-style method to set target FPR
    pub fn with_target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = fpr;
        self
    }
}

/// Builder for RegistryConfig with validation
#[derive(Default)]
pub struct RegistryConfigBuilder {
    data_dir: Option<PathBuf>,
    expected_items: Option<usize>,
    target_fpr: Option<f64>,
    growth_factor: Option<f64>,
    cache_prefix: Option<String>,
    lookup_ttl_secs: Option<u64>,
    registration_ttl_secs: Option<u64>,
    cache_capacity: Option<usize>,
    max_name_length: Option<usize>,
    verify_suggestions: Option<bool>,
    suggestion_attempts: Option<usize>,
}

impl RegistryConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn expected_items(mut self, items: usize) -> Self {
        self.expected_items = Some(items);
        self
    }

    /// Set target false positive rate (must be in (0, 1))
    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Set growth factor (must be > 1)
    pub fn growth_factor(mut self, factor: f64) -> Self {
        self.growth_factor = Some(factor);
        self
    }

    pub fn cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_prefix = Some(prefix.into());
        self
    }

    pub fn lookup_ttl_secs(mut self, secs: u64) -> Self {
        self.lookup_ttl_secs = Some(secs);
        self
    }

    pub fn registration_ttl_secs(mut self, secs: u64) -> Self {
        self.registration_ttl_secs = Some(secs);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Cap canonical name length (uncapped by default)
    pub fn max_name_length(mut self, length: usize) -> Self {
        self.max_name_length = Some(length);
        self
    }

    pub fn verify_suggestions(mut self, verify: bool) -> Self {
        self.verify_suggestions = Some(verify);
        self
    }

    pub fn suggestion_attempts(mut self, attempts: usize) -> Self {
        self.suggestion_attempts = Some(attempts);
        self
    }

    /// Build the RegistryConfig, validating all parameters
    pub fn build(self) -> Result<RegistryConfig, RegistryError> {
        let defaults = RegistryConfig::default();

        let config = RegistryConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            expected_items: self.expected_items.unwrap_or(defaults.expected_items),
            target_fpr: self.target_fpr.unwrap_or(defaults.target_fpr),
            growth_factor: self.growth_factor.unwrap_or(defaults.growth_factor),
            cache_prefix: self.cache_prefix.unwrap_or(defaults.cache_prefix),
            lookup_ttl_secs: self.lookup_ttl_secs.unwrap_or(defaults.lookup_ttl_secs),
            registration_ttl_secs: self
                .registration_ttl_secs
                .unwrap_or(defaults.registration_ttl_secs),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
            max_name_length: self.max_name_length.or(defaults.max_name_length),
            verify_suggestions: self.verify_suggestions.unwrap_or(defaults.verify_suggestions),
            suggestion_attempts: self
                .suggestion_attempts
                .unwrap_or(defaults.suggestion_attempts),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RegistryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lookup_ttl(), Duration::from_secs(180));
        assert_eq!(config.registration_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn test_validation_rejects_fpr_out_of_range() {
        for fpr in [0.0, 1.0, -0.5, f64::NAN] {
            let config = RegistryConfig::default().with_target_fpr(fpr);
            assert!(
                matches!(config.validate(), Err(RegistryError::InvalidConfig(_))),
                "fpr {} should be rejected",
                fpr
            );
        }
    }

    #[test]
    fn test_validation_rejects_non_growing_factor() {
        let config = RegistryConfig {
            growth_factor: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RegistryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_name_length_uncapped_by_default() {
        assert_eq!(RegistryConfig::default().max_name_length, None);

        let capped = RegistryConfigBuilder::new().max_name_length(40).build().unwrap();
        assert_eq!(capped.max_name_length, Some(40));

        let result = RegistryConfigBuilder::new().max_name_length(0).build();
        assert!(matches!(result, Err(RegistryError::InvalidConfig(_))));
    }

    #[test]
    fn test_validation_rejects_zero_attempts() {
        let result = RegistryConfigBuilder::new().suggestion_attempts(0).build();
        assert!(matches!(result, Err(RegistryError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_creates_valid_config() {
        let config = RegistryConfigBuilder::new()
            .data_dir("/tmp/names")
            .expected_items(500)
            .target_fpr(0.05)
            .growth_factor(1.5)
            .cache_prefix("handle")
            .verify_suggestions(true)
            .build()
            .expect("Should create valid config");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/names"));
        assert_eq!(config.expected_items, 500);
        assert_eq!(config.target_fpr, 0.05);
        assert_eq!(config.growth_factor, 1.5);
        assert_eq!(config.cache_prefix, "handle");
        assert!(config.verify_suggestions);
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = RegistryConfigBuilder::new()
            .target_fpr(0.02)
            .build()
            .expect("Should use defaults for other fields");

        let defaults = RegistryConfig::default();
        assert_eq!(config.expected_items, defaults.expected_items);
        assert_eq!(config.lookup_ttl_secs, defaults.lookup_ttl_secs);
        assert_eq!(config.cache_prefix, defaults.cache_prefix);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = RegistryConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: RegistryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
