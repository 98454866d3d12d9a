//! Service configuration.
//!
//! Values load from an optional `shutterbin.toml` in the working directory,
//! overridden by `SHUTTERBIN__*` environment variables; every field has a
//! default so the server runs with no configuration at all.

use chrono::Duration;
use config::{Config, Environment, File};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use shutterbin_error::ConfigError;
use shutterbin_quota::QuotaConfig;

/// Top-level configuration for the shutterbin server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ShutterbinConfig {
    /// Socket address the HTTP server binds to
    #[serde(default = "default_server_address")]
    server_address: String,

    /// Directory holding the backing media files
    #[serde(default = "default_media_root")]
    media_root: String,

    /// Path of the SQLite record store
    #[serde(default = "default_database_url")]
    database_url: String,

    /// Retention window in hours; records expire this long after creation
    #[serde(default = "default_retention_hours")]
    retention_hours: i64,

    /// Per-address storage quota settings
    #[serde(default)]
    quota: QuotaConfig,
}

fn default_server_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_media_root() -> String {
    "uploads".to_string()
}

fn default_database_url() -> String {
    "shutterbin.db".to_string()
}

fn default_retention_hours() -> i64 {
    24
}

impl Default for ShutterbinConfig {
    fn default() -> Self {
        Self {
            server_address: default_server_address(),
            media_root: default_media_root(),
            database_url: default_database_url(),
            retention_hours: default_retention_hours(),
            quota: QuotaConfig::default(),
        }
    }
}

impl ShutterbinConfig {
    /// Load configuration from `shutterbin.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or a value
    /// fails to deserialize.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("shutterbin").required(false))
            .add_source(Environment::with_prefix("SHUTTERBIN").separator("__"))
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(e.to_string()))
    }

    /// The retention window as a duration.
    pub fn retention(&self) -> Duration {
        Duration::hours(self.retention_hours)
    }
}
