//! Configuration file handling for the secrets CLI
//!
//! Manages loading and saving CLI configuration from ~/.wfsecrets/config.toml
//! and layering it with flags and environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ConsoleConfig;
use crate::secrets::SecretString;

/// CLI configuration stored in ~/.wfsecrets/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Bearer token for the platform API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Base URL for the platform API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Read cache lifetime in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_logs: Option<bool>,
}

/// Connection settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionFlags {
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Get the default configuration file path (~/.wfsecrets/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        Ok(PathBuf::from(home).join(".wfsecrets").join("config.toml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load configuration from a specific path; a missing file is empty config
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Set one key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "token" => self.token = Some(value.to_string()),
            "base_url" => self.base_url = Some(value.to_string()),
            "timeout" => {
                let timeout =
                    value.parse().context("Invalid timeout value. Must be a number in seconds")?;
                self.timeout = Some(timeout);
            }
            "cache_ttl" => {
                let ttl =
                    value.parse().context("Invalid cache_ttl value. Must be a number in seconds")?;
                self.cache_ttl = Some(ttl);
            }
            "log_level" => self.log_level = Some(value.to_string()),
            "json_logs" => {
                let json = value.parse().context("Invalid json_logs value. Use true or false")?;
                self.json_logs = Some(json);
            }
            _ => anyhow::bail!(
                "Unknown configuration key: '{}'. Valid keys: {}",
                key,
                Self::KEYS.join(", ")
            ),
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 6] =
        ["token", "base_url", "timeout", "cache_ttl", "log_level", "json_logs"];
}

/// Resolve the effective configuration.
///
/// Each setting is taken from the first source that has it:
/// 1. command line flags
/// 2. ~/.wfsecrets/config.toml
/// 3. WFSECRETS_* environment variables
/// 4. built-in defaults
pub fn resolve_config(flags: ConnectionFlags) -> Result<ConsoleConfig> {
    let file = match CliConfig::load() {
        Ok(file) => file,
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable config file");
            CliConfig::default()
        }
    };
    let env = ConsoleConfig::from_env()?;
    layer(env, &file, flags)
}

/// Apply the config file and then the flags on top of `base`
pub fn layer(
    mut config: ConsoleConfig,
    file: &CliConfig,
    flags: ConnectionFlags,
) -> Result<ConsoleConfig> {
    if let Some(token) = file.token.as_deref().filter(|t| !t.is_empty()) {
        debug!("Using token from config file");
        config.token = Some(SecretString::new(token));
    }
    if let Some(url) = file.base_url.as_deref().filter(|u| !u.is_empty()) {
        debug!("Using base URL from config file: {}", url);
        config.base_url = url.to_string();
    }
    if let Some(timeout) = file.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(ttl) = file.cache_ttl {
        config.cache_ttl_secs = ttl;
    }
    if let Some(level) = &file.log_level {
        config.logging.level = level.clone();
    }
    if let Some(json) = file.json_logs {
        config.logging.json = json;
    }

    if let Some(token) = resolve_token(flags.token, flags.token_file)? {
        config.token = Some(token);
    }
    if let Some(url) = flags.base_url {
        debug!("Using base URL from --base-url flag: {}", url);
        config.base_url = url;
    }
    if let Some(timeout) = flags.timeout {
        debug!("Using timeout from --timeout flag: {} seconds", timeout);
        config.timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}

/// Token from `--token`, else from `--token-file`
fn resolve_token(
    token_flag: Option<String>,
    token_file_flag: Option<PathBuf>,
) -> Result<Option<SecretString>> {
    if let Some(token) = token_flag {
        debug!("Using token from --token flag");
        return Ok(Some(SecretString::new(token)));
    }

    if let Some(token_file) = token_file_flag {
        debug!("Reading token from file: {}", token_file.display());
        let token = std::fs::read_to_string(&token_file)
            .with_context(|| format!("Failed to read token file: {}", token_file.display()))?;
        let token = token.trim();

        if token.is_empty() {
            anyhow::bail!("Token file is empty: {}", token_file.display());
        }
        return Ok(Some(SecretString::new(token)));
    }

    Ok(None)
}
