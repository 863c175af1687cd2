//! Configuration schema definitions.
//!
//! Settings for the `serve-config` tool itself: where the serve config lives
//! and how to reach the local daemon. Not to be confused with the serve
//! config document, which is in `crate::serve::types`.

use serde::{Deserialize, Serialize};

/// Root configuration for the tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    /// Local daemon API settings.
    pub local_api: LocalApiConfig,

    /// Where the serve config document is stored.
    pub store: StoreConfig,

    /// How this node's DNS name is determined.
    pub identity: IdentityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Local daemon API settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LocalApiConfig {
    /// Base URL of the daemon's local API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LocalApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:41112".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Which store backend holds the serve config.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// The daemon's local API.
    #[default]
    LocalApi,
    /// A JSON file on disk.
    File,
}

/// Store settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// JSON file path for the `file` backend.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::LocalApi,
            path: "serve-config.json".to_string(),
        }
    }
}

/// Identity settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct IdentityConfig {
    /// Fixed DNS name for this node. Empty means ask the daemon.
    pub dns_name: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
