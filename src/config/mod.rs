//! # Configuration Management
//!
//! Settings for the secrets console: where the platform API lives, how to
//! authenticate, request timeout, read-cache TTL and logging.
//!
//! Values come from `WFSECRETS_*` environment variables with defaults; the
//! CLI layers its flags and config file on top (see `cli::config`).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::client::ClientConfig;
use crate::errors::{Error, Result};
use crate::secrets::SecretString;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Console configuration
#[derive(Debug, Clone, Validate)]
pub struct ConsoleConfig {
    /// Base URL of the platform REST API
    #[validate(url(message = "Base URL must be a valid URL"))]
    pub base_url: String,

    /// Bearer token, if the API requires one
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_secs: u64,

    /// How long list/detail reads stay cached (0 disables caching)
    #[validate(range(max = 86400, message = "Cache TTL must be at most one day"))]
    pub cache_ttl_secs: u64,

    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,

    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let config = Self {
            base_url: get("WFSECRETS_BASE_URL").unwrap_or(defaults.base_url),
            token: get("WFSECRETS_TOKEN").map(SecretString::new),
            timeout_secs: parse_var(get("WFSECRETS_TIMEOUT"), "WFSECRETS_TIMEOUT")?
                .unwrap_or(defaults.timeout_secs),
            cache_ttl_secs: parse_var(get("WFSECRETS_CACHE_TTL"), "WFSECRETS_CACHE_TTL")?
                .unwrap_or(defaults.cache_ttl_secs),
            logging: LoggingConfig {
                level: get("WFSECRETS_LOG_LEVEL").unwrap_or(defaults.logging.level),
                json: parse_var(get("WFSECRETS_JSON_LOGS"), "WFSECRETS_JSON_LOGS")?
                    .unwrap_or(defaults.logging.json),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges and formats
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// HTTP client settings derived from this configuration
    pub fn client_config(&self, verbose: bool) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            timeout: self.timeout_secs,
            verbose,
        }
    }
}

fn parse_var<T: std::str::FromStr>(value: Option<String>, key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|v| v.parse::<T>().map_err(|e| Error::config(format!("Invalid {}: {}", key, e))))
        .transpose()
}
