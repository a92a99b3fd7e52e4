//! Application configuration structures

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub identity: IdentityConfig,
    pub profile_store: ProfileStoreConfig,
    pub cache: CacheConfig,
}

/// Identity service connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the identity service REST API.
    pub base_url: String,
    /// Project API key appended to every request.
    pub api_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

/// Profile document store connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStoreConfig {
    /// Base URL of the document store REST API.
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

/// Local session cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path of the JSON file holding the advisory session cache entry.
    pub path: String,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}
