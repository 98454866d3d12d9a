//! Quota configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Configuration for the per-address storage quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct QuotaConfig {
    /// Cumulative byte cap per owner address
    #[serde(default = "default_max_bytes_per_address")]
    max_bytes_per_address: u64,

    /// Byte ceiling for a single uploaded file
    #[serde(default = "default_max_file_bytes")]
    max_file_bytes: u64,
}

fn default_max_bytes_per_address() -> u64 {
    100 * 1024 * 1024 // 100 MiB
}

fn default_max_file_bytes() -> u64 {
    50 * 1024 * 1024 // 50 MiB
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_bytes_per_address: default_max_bytes_per_address(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl QuotaConfig {
    /// Config with explicit limits.
    pub fn new(max_bytes_per_address: u64, max_file_bytes: u64) -> Self {
        Self {
            max_bytes_per_address,
            max_file_bytes,
        }
    }

    /// Config with an explicit cap, keeping the default per-file ceiling.
    pub fn with_cap(max_bytes_per_address: u64) -> Self {
        Self {
            max_bytes_per_address,
            ..Self::default()
        }
    }
}
