//! Configuration management CLI commands
//!
//! Provides commands for managing ~/.wfsecrets/config.toml

use anyhow::Result;
use clap::Subcommand;
use std::path::Path;

use super::config::CliConfig;
use super::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize configuration file with default values
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "yaml", value_parser = ["json", "yaml", "table"])]
        output: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (token, base_url, timeout, cache_ttl, log_level, json_logs)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get configuration file path
    Path,
}

/// Handle config commands
pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    let path = CliConfig::config_path()?;

    match command {
        ConfigCommands::Init { force } => init_config(&path, force)?,
        ConfigCommands::Show { output } => show_config(&path, &output)?,
        ConfigCommands::Set { key, value } => set_config(&path, &key, &value)?,
        ConfigCommands::Path => println!("{}", path.display()),
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    CliConfig::default().save_to_path(path)?;

    println!("Configuration file created at: {}", path.display());
    println!("\nYou can now set values using:");
    println!("  wfsecrets config set token <your-token>");
    println!("  wfsecrets config set base_url <api-url>");
    println!("  wfsecrets config set timeout <seconds>");

    Ok(())
}

fn show_config(path: &Path, output_format: &str) -> Result<()> {
    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'wfsecrets config init' to create one");
        return Ok(());
    }

    let mut config = CliConfig::load_from_path(path)?;
    config.token = config.token.as_deref().map(mask_token);

    if output_format == "table" {
        print_config_table(&config, path);
    } else {
        output::print_output(&config, output_format)?;
    }

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load_from_path(path).unwrap_or_default();
    config.set(key, value)?;
    config.save_to_path(path)?;

    if key == "token" {
        println!("Token set successfully");
    } else {
        println!("{} set to: {}", key, value);
    }
    println!("Configuration saved to: {}", path.display());

    Ok(())
}

/// Keep only the last four characters of a token visible
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn print_config_table(config: &CliConfig, path: &Path) {
    let not_set = || "<not set>".to_string();

    println!();
    println!("{:<15} {:<50}", "Key", "Value");
    output::print_separator(65);

    println!("{:<15} {}", "token", config.token.clone().unwrap_or_else(not_set));
    println!("{:<15} {}", "base_url", config.base_url.clone().unwrap_or_else(not_set));
    println!(
        "{:<15} {}",
        "timeout",
        config.timeout.map(|t| format!("{} seconds", t)).unwrap_or_else(not_set)
    );
    println!(
        "{:<15} {}",
        "cache_ttl",
        config.cache_ttl.map(|t| format!("{} seconds", t)).unwrap_or_else(not_set)
    );
    println!("{:<15} {}", "log_level", config.log_level.clone().unwrap_or_else(not_set));
    println!(
        "{:<15} {}",
        "json_logs",
        config.json_logs.map(|j| j.to_string()).unwrap_or_else(not_set)
    );

    println!();
    println!("Config file: {}", path.display());
    println!();
}
