//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file
//! and are deserialized directly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("store.cache_ttl_seconds cannot be 0")]
    InvalidCacheTtl,

    #[error("dispatch.suggestion_limit cannot be 0")]
    InvalidSuggestionLimit,
}

/// Raw store configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// How long cached collection reads stay fresh
    pub cache_ttl_seconds: u64,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 300,
        }
    }
}

/// Raw data configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDataConfig {
    /// JSON file to seed the in-memory store from
    pub seed_file: Option<PathBuf>,
}

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// How many "did you mean" suggestions a failed lookup carries
    pub suggestion_limit: usize,
    /// Default result count for staff recommendations
    pub recommend_limit: usize,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: 3,
            recommend_limit: 5,
        }
    }
}

/// Complete raw configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub store: FileStoreConfig,
    pub data: FileDataConfig,
    pub dispatch: FileDispatchConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.store.cache_ttl_seconds == 0 {
            return Err(ConfigValidationError::InvalidCacheTtl);
        }
        if self.dispatch.suggestion_limit == 0 {
            return Err(ConfigValidationError::InvalidSuggestionLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.store.cache_ttl_seconds, 300);
        assert!(config.data.seed_file.is_none());
        assert_eq!(config.dispatch.suggestion_limit, 3);
        assert_eq!(config.dispatch.recommend_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = FileConfig::default();
        config.store.cache_ttl_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidCacheTtl)
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FileConfig = toml::from_str("[store]\ncache_ttl_seconds = 60\n").unwrap();
        assert_eq!(config.store.cache_ttl_seconds, 60);
        assert_eq!(config.dispatch.recommend_limit, 5);
    }
}
