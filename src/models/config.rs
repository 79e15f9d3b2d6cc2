//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// TMDB (catalog provider) configuration.
    pub tmdb: TmdbConfig,
    /// OMDb (rating provider) configuration.
    pub omdb: OmdbConfig,
    /// Resolution tuning.
    pub resolver: ResolverConfig,
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// API key (v3) or Bearer token (v4).
    pub api_key: Option<String>,
}

/// OMDb configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// API key.
    pub api_key: Option<String>,
}

/// Resolution cascade tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Primary search locale (e.g. "de-DE").
    pub language: String,
    /// Broad fallback locale tried after the primary one.
    pub fallback_language: String,
    /// Titles resolved concurrently per batch group.
    pub resolve_group_size: usize,
    /// Rating lookups performed concurrently per batch group.
    pub rating_group_size: usize,
    /// Pause between batch groups, in milliseconds.
    pub group_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb: TmdbConfig::default(),
            omdb: OmdbConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("TMDB_API_KEY").ok(),
        }
    }
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OMDB_API_KEY").ok(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            language: std::env::var("COVERMATCH_LANGUAGE")
                .unwrap_or_else(|_| "de-DE".to_string()),
            fallback_language: "en-US".to_string(),
            resolve_group_size: 3,
            rating_group_size: 5,
            group_delay_ms: 250,
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("covermatch")
}

/// Load configuration from file.
///
/// Environment variables take effect through the `Default` impls, so a
/// missing or partial config file still picks up `TMDB_API_KEY` etc.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    if config_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str(&content) {
                return config;
            }
        }
    }

    Config::default()
}
