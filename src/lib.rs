//! # wfsecrets
//!
//! Management of the secrets a workflow orchestration platform injects into
//! workflow executions. A secret is a named value that lives either in the
//! global namespace or in exactly one workflow's namespace.
//!
//! ## Architecture
//!
//! ```text
//! CLI / views → SecretFormController → SecretRepository → SecretsApi (HTTP)
//!                                            ↓
//!                                        QueryCache
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wfsecrets::client::ApiClient;
//! use wfsecrets::secrets::{HttpSecretsApi, QueryCache, Scope, SecretRepository};
//! use wfsecrets::{ConsoleConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConsoleConfig::from_env()?;
//!     let client = ApiClient::new(config.client_config(false))?;
//!     let api = Arc::new(HttpSecretsApi::new(client));
//!     let repository = SecretRepository::new(api, QueryCache::new(config.cache_ttl()));
//!
//!     for name in repository.list(&Scope::workflow("billing")).await? {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::ConsoleConfig;
pub use errors::{Error, Result};
pub use secrets::{Scope, SecretFormController, SecretRepository};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
