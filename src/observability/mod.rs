//! # Logging
//!
//! Structured logging for the console via `tracing`. Log lines go to stderr so
//! command output on stdout stays machine readable.

use tracing_subscriber::EnvFilter;

use crate::config::{ConsoleConfig, LoggingConfig};

/// Build the filter: `RUST_LOG` wins, then `--verbose`, then the configured level
pub fn env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (tests, embedding
/// applications); that is not an error.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> bool {
    let filter = env_filter(config, verbose);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.with_target(false).try_init()
    };

    result.is_ok()
}

/// Log the effective configuration (never the token)
pub fn log_config_info(config: &ConsoleConfig) {
    tracing::debug!(
        base_url = %config.base_url,
        timeout_secs = config.timeout_secs,
        cache_ttl_secs = config.cache_ttl_secs,
        authenticated = config.token.is_some(),
        json_logs = config.logging.json,
        "Secrets console configuration"
    );
}
