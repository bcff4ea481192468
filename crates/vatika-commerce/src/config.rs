//! Storefront configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vatika_cache::{Cache, FileStore};

use crate::error::CommerceError;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Cart behavior.
    #[serde(default)]
    pub cart: CartConfig,

    /// Checkout behavior.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Where persisted state lives.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl StorefrontConfig {
    /// Load config from a file (TOML, or JSON when the extension is `.json`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CommerceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.cart.storage_key.trim().is_empty() {
            return Err(CommerceError::Config("cart.storage_key must not be empty".into()));
        }
        if self.cart.max_quantity_per_line == 0 {
            return Err(CommerceError::Config(
                "cart.max_quantity_per_line must be at least 1".into(),
            ));
        }
        if self.checkout.submission_timeout_ms == 0 {
            return Err(CommerceError::Config(
                "checkout.submission_timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Open the configured cache: file-backed when `storage.path` is set,
    /// in-memory otherwise.
    pub fn open_cache(&self) -> Result<Cache, CommerceError> {
        let cache = match &self.storage.path {
            Some(path) => Cache::new(Arc::new(FileStore::open(path)?)),
            None => Cache::in_memory(),
        };
        Ok(match &self.storage.namespace {
            Some(ns) => cache.with_namespace(ns.clone()),
            None => cache,
        })
    }
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storage key the cart is saved under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Upper bound on a single line's quantity.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_line: u32,

    /// Consecutive failed saves before the cart reports degraded persistence.
    #[serde(default = "default_warning_threshold")]
    pub persistence_warning_threshold: u32,
}

fn default_storage_key() -> String {
    "cart".to_string()
}

fn default_max_quantity() -> u32 {
    9999
}

fn default_warning_threshold() -> u32 {
    3
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            max_quantity_per_line: default_max_quantity(),
            persistence_warning_threshold: default_warning_threshold(),
        }
    }
}

/// Checkout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// How long to wait for the booking submitter before treating the
    /// attempt as failed.
    #[serde(default = "default_submission_timeout_ms")]
    pub submission_timeout_ms: u64,
}

fn default_submission_timeout_ms() -> u64 {
    10_000
}

impl CheckoutConfig {
    pub fn submission_timeout(&self) -> Duration {
        Duration::from_millis(self.submission_timeout_ms)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            submission_timeout_ms: default_submission_timeout_ms(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the file-backed store. In-memory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Key prefix, e.g. one per browser profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}
