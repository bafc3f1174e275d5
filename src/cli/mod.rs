//! # Command Line Interface
//!
//! Manages scoped secrets on a workflow platform over its REST API, plus the
//! local CLI configuration file.

pub mod config;
pub mod config_cmd;
pub mod output;
pub mod secrets;
pub mod workflows;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::client::ApiClient;
use crate::config::{ConsoleConfig, LoggingConfig};
use crate::observability::{init_logging, log_config_info};
use crate::secrets::{HttpSecretsApi, QueryCache, SecretRepository};

#[derive(Parser)]
#[command(name = "wfsecrets")]
#[command(about = "Manage global and workflow-scoped secrets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token for API authentication
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to file containing the bearer token
    #[arg(long, global = true)]
    pub token_file: Option<std::path::PathBuf>,

    /// Base URL for the platform API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Secret management commands
    Secret {
        #[command(subcommand)]
        command: secrets::SecretCommands,
    },

    /// List workflow names usable as a secret scope
    Workflows {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table", value_parser = ["json", "yaml", "table"])]
        output: String,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

impl Cli {
    fn connection_flags(&self) -> config::ConnectionFlags {
        config::ConnectionFlags {
            token: self.token.clone(),
            token_file: self.token_file.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the current settings are invalid.
    if let Commands::Config { command } = cli.command {
        init_logging(&LoggingConfig::default(), cli.verbose);
        return config_cmd::handle_config_command(command).await;
    }

    let console = config::resolve_config(cli.connection_flags())?;
    init_logging(&console.logging, cli.verbose);
    log_config_info(&console);

    match cli.command {
        Commands::Secret { command } => {
            let repository = create_repository(&console, cli.verbose)?;
            secrets::handle_secret_command(command, &repository).await?
        }
        Commands::Workflows { output } => {
            let client = ApiClient::new(console.client_config(cli.verbose))?;
            workflows::handle_workflows_command(&client, &output).await?
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Wire the HTTP API, the read cache and the repository
fn create_repository(console: &ConsoleConfig, verbose: bool) -> anyhow::Result<SecretRepository> {
    let client = ApiClient::new(console.client_config(verbose))?;
    debug!(base_url = client.base_url(), "Created API client");

    let api = HttpSecretsApi::new(client);
    Ok(SecretRepository::new(Arc::new(api), QueryCache::new(console.cache_ttl())))
}
