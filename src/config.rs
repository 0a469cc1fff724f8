//! Configuration for da-extra-cache.

use crate::cache::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metadata cache chain configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Metadata cache chain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Timeout applied to every individual backend call, in milliseconds.
    #[serde(default = "default_backend_timeout_ms")]
    pub backend_timeout_ms: u64,

    /// Backends in priority order (first is queried first).
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendConfig>,
}

/// A single backend in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-process LRU cache.
    Memory {
        /// Maximum number of records held.
        #[serde(default = "default_capacity")]
        capacity: usize,
    },
    /// Durable directory store.
    Filesystem {
        /// Directory records are written to.
        #[serde(default = "default_root_dir")]
        root_dir: PathBuf,
    },
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend_timeout_ms: default_backend_timeout_ms(),
            backends: default_backends(),
        }
    }
}

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::Memory {
            capacity: default_capacity(),
        },
        BackendConfig::Filesystem {
            root_dir: default_root_dir(),
        },
    ]
}

fn default_root_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "da-extra")
        .map(|dirs| dirs.data_dir().join("extra-info"))
        .unwrap_or_else(|| PathBuf::from(".da-extra/extra-info"))
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

const fn default_backend_timeout_ms() -> u64 {
    2_000
}

impl CacheConfig {
    /// Check values serde cannot rule out.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the backend timeout is zero.
    pub fn validate(&self) -> crate::Result<()> {
        if self.backend_timeout_ms == 0 {
            return Err(crate::Error::Config(
                "cache.backend_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl ProxyConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds invalid
    /// values.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.cache.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
