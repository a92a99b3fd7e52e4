//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `STUDYLOOP_IDENTITY_URL`: Identity service base URL
//! - `STUDYLOOP_IDENTITY_API_KEY`: Identity service API key
//! - `STUDYLOOP_PROFILE_STORE_URL`: Document store base URL
//! - `STUDYLOOP_PROFILE_STORE_API_KEY`: Document store API key
//! - `STUDYLOOP_CACHE_PATH`: Session cache file path
//! - `STUDYLOOP_HTTP_TIMEOUT`: Request timeout in seconds (optional)
//! - `STUDYLOOP_HTTP_RETRIES`: Max request attempts (optional)

use std::path::PathBuf;

use studyloop_domain::{
    AuthError, CacheConfig, Config, IdentityConfig, ProfileStoreConfig, Result,
};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_RETRIES: usize = 3;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `AuthError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `AuthError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let identity_url = env_var("STUDYLOOP_IDENTITY_URL")?;
    let identity_key = env_var("STUDYLOOP_IDENTITY_API_KEY")?;
    let store_url = env_var("STUDYLOOP_PROFILE_STORE_URL")?;
    let store_key = env_var("STUDYLOOP_PROFILE_STORE_API_KEY")?;
    let cache_path = env_var("STUDYLOOP_CACHE_PATH")?;

    let timeout_seconds = env_parse("STUDYLOOP_HTTP_TIMEOUT", DEFAULT_TIMEOUT_SECONDS)?;
    let max_retries = env_parse("STUDYLOOP_HTTP_RETRIES", DEFAULT_MAX_RETRIES)?;

    Ok(Config {
        identity: IdentityConfig {
            base_url: identity_url,
            api_key: identity_key,
            timeout_seconds,
            max_retries,
        },
        profile_store: ProfileStoreConfig {
            base_url: store_url,
            api_key: store_key,
            timeout_seconds,
            max_retries,
        },
        cache: CacheConfig { path: cache_path },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AuthError::Config` if no file is found or the contents are
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AuthError::Config(format!("config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AuthError::Config("no config file found in any of the standard locations".to_string())
        })?,
    };

    let contents = std::fs::read_to_string(&config_path).map_err(|err| {
        AuthError::Config(format!("failed to read {}: {err}", config_path.display()))
    })?;

    let config = match config_path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str::<Config>(&contents)
            .map_err(|err| AuthError::Config(format!("invalid TOML config: {err}")))?,
        _ => serde_json::from_str::<Config>(&contents)
            .map_err(|err| AuthError::Config(format!("invalid JSON config: {err}")))?,
    };

    tracing::info!(path = %config_path.display(), "configuration loaded from file");
    Ok(config)
}

/// Probe the standard config file locations, nearest first.
fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.json", "config.toml", "studyloop.json", "studyloop.toml"];
    let bases = [PathBuf::from("."), PathBuf::from(".."), PathBuf::from("../..")];

    for base in &bases {
        for name in &names {
            let candidate = base.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| AuthError::Config(format!("missing environment variable {name}")))
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|err| AuthError::Config(format!("invalid value for {name}: {err}"))),
        Err(_) => Ok(default),
    }
}
