use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// TMDB catalog client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// TMDB API key (v3 auth).
    pub api_key: String,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Image host prefix that size tokens and image paths are appended to
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Language sent with every request
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl CatalogConfig {
    /// Config with the given key and every other field at its default.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

pub(crate) fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

pub(crate) fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Backing store for the local watch state
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// Single-table SQLite key-value file
    Sqlite,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database file for the sqlite backend
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Byte quota for the memory backend (unlimited when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
            quota_bytes: None,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bloxwave.db")
}

/// Simulated playback configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Wall-clock time between progress ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Runtime assumed for movies the catalog reports no runtime for
    #[serde(default = "default_fallback_runtime")]
    pub fallback_runtime_minutes: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            fallback_runtime_minutes: default_fallback_runtime(),
        }
    }
}

fn default_tick_interval() -> u64 {
    1000
}

fn default_fallback_runtime() -> u32 {
    120
}

/// Sanitized config for logging (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub catalog: SanitizedCatalogConfig,
    pub storage: StorageConfig,
    pub playback: PlaybackConfig,
}

/// Catalog config with the API key hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                image_base_url: config.catalog.image_base_url.clone(),
                language: config.catalog.language.clone(),
                api_key_configured: !config.catalog.api_key.is_empty(),
                timeout_secs: config.catalog.timeout_secs,
            },
            storage: config.storage.clone(),
            playback: config.playback.clone(),
        }
    }
}
