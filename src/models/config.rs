//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.user_agent.trim().is_empty() {
            return Err(AppError::config("search.user_agent is empty"));
        }
        if self.search.timeout_secs == 0 {
            return Err(AppError::config("search.timeout_secs must be > 0"));
        }
        if self.search.default_limit == 0 || self.search.default_limit > defaults::MAX_LIMIT {
            return Err(AppError::config(format!(
                "search.default_limit must be between 1 and {}",
                defaults::MAX_LIMIT
            )));
        }
        url::Url::parse(&self.search.base_url)?;
        url::Url::parse(&self.search.cover_base_url)?;
        Ok(())
    }
}

/// Search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint returning a JSON body with a `docs` array
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Prefix for cover thumbnail URLs
    #[serde(default = "defaults::cover_base_url")]
    pub cover_base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Query used when none is given
    #[serde(default = "defaults::default_query")]
    pub default_query: String,

    /// Result count requested when none is given
    #[serde(default = "defaults::default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            cover_base_url: defaults::cover_base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            default_query: defaults::default_query(),
            default_limit: defaults::default_limit(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub const MAX_LIMIT: usize = 1000;

    pub fn base_url() -> String {
        "https://openlibrary.org/search.json".into()
    }
    pub fn cover_base_url() -> String {
        "https://covers.openlibrary.org/b/id".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; folio/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn default_query() -> String {
        "javascript".into()
    }
    pub fn default_limit() -> usize {
        50
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
