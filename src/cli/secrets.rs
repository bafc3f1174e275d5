//! Secret CLI commands
//!
//! Each write goes through [`SecretFormController`] so the command line
//! enforces the same rules as the console form: trimmed non-empty name and
//! value, immutable name and scope on existing secrets, and an explicit
//! confirmation before delete.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::{BufRead, Read};
use std::path::PathBuf;

use super::output::{self, truncate};
use crate::secrets::{
    Scope, SecretFormController, SecretListView, SecretRepository, SecretString, SecretsError,
};

#[derive(Subcommand)]
pub enum SecretCommands {
    /// List secret names in a scope
    #[command(
        after_help = "EXAMPLES:\n    # Global secrets\n    wfsecrets secret list\n\n    # Secrets visible only to one workflow\n    wfsecrets secret list --workflow billing --output json"
    )]
    List {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table", value_parser = ["json", "yaml", "table"])]
        output: String,
    },

    /// Show one secret
    Get {
        /// Secret name
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Print the secret value instead of a redaction marker
        #[arg(long)]
        show_value: bool,

        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table", value_parser = ["json", "yaml", "table"])]
        output: String,
    },

    /// Check whether a secret exists
    Exists {
        /// Secret name
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Create a secret (an existing secret with the same name is overwritten)
    #[command(
        after_help = "EXAMPLES:\n    # Value from a flag\n    wfsecrets secret create db-pass --value s3cr3t\n\n    # Value from stdin, scoped to a workflow\n    printf 'k-123' | wfsecrets secret create api-key --workflow billing"
    )]
    Create {
        /// Secret name
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        value: ValueArgs,
    },

    /// Replace the value of an existing secret
    Update {
        /// Secret name
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        value: ValueArgs,
    },

    /// Delete a secret
    #[command(
        long_about = "Delete a secret from its scope.\n\nWARNING: Workflows that reference the secret will fail to resolve it.",
        after_help = "EXAMPLES:\n    # Delete with confirmation prompt\n    wfsecrets secret delete api-key --workflow billing\n\n    # Delete without confirmation\n    wfsecrets secret delete api-key --yes"
    )]
    Delete {
        /// Secret name
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Namespace selection shared by all secret commands
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Workflow namespace; omit for global secrets
    #[arg(short, long, value_name = "WORKFLOW")]
    pub workflow: Option<String>,
}

impl ScopeArgs {
    pub fn scope(&self) -> Scope {
        Scope::from_workflow(self.workflow.as_deref())
    }
}

/// Where a secret value comes from; stdin when neither flag is given
#[derive(Args, Debug, Clone, Default)]
pub struct ValueArgs {
    /// Secret value (visible in shell history; prefer --value-file or stdin)
    #[arg(long, value_name = "VALUE", conflicts_with = "value_file")]
    pub value: Option<String>,

    /// Read the secret value from a file
    #[arg(long, value_name = "FILE")]
    pub value_file: Option<PathBuf>,
}

impl ValueArgs {
    fn read(self) -> Result<SecretString> {
        if let Some(value) = self.value {
            return Ok(SecretString::new(value));
        }
        if let Some(path) = self.value_file {
            let value = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read value file: {}", path.display()))?;
            return Ok(SecretString::new(value));
        }

        let mut value = String::new();
        std::io::stdin().read_to_string(&mut value).context("Failed to read value from stdin")?;
        Ok(SecretString::new(value))
    }
}

/// Handle secret commands
pub async fn handle_secret_command(
    command: SecretCommands,
    repository: &SecretRepository,
) -> Result<()> {
    match command {
        SecretCommands::List { scope, output } => {
            list_secrets(repository, scope.scope(), &output).await?
        }
        SecretCommands::Get { name, scope, show_value, output } => {
            get_secret(repository, &name, scope.scope(), show_value, &output).await?
        }
        SecretCommands::Exists { name, scope } => {
            let exists = repository.exists(&name, &scope.scope()).await?;
            println!("{}", exists);
        }
        SecretCommands::Create { name, scope, value } => {
            let saved = create_secret(repository, &name, scope.scope(), value.read()?).await?;
            println!("Secret '{}' saved ({})", saved, scope.scope().label());
        }
        SecretCommands::Update { name, scope, value } => {
            update_secret(repository, &name, scope.scope(), value.read()?).await?;
            println!("Secret '{}' updated ({})", name, scope.scope().label());
        }
        SecretCommands::Delete { name, scope, yes } => {
            let deleted = delete_secret(repository, &name, scope.scope(), |message| {
                if yes {
                    return Ok(true);
                }
                prompt_confirmation(message)
            })
            .await?;

            if deleted {
                println!("Secret '{}' deleted successfully", name);
            } else {
                println!("Cancelled");
            }
        }
    }

    Ok(())
}

async fn list_secrets(repository: &SecretRepository, scope: Scope, output: &str) -> Result<()> {
    let view = SecretListView::load(repository, scope).await?;

    if output == "table" {
        print_secrets_table(&view);
    } else {
        output::print_output(&view, output)?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RevealedSecret<'a> {
    name: &'a str,
    scope: &'a Scope,
    value: &'a str,
}

async fn get_secret(
    repository: &SecretRepository,
    name: &str,
    scope: Scope,
    show_value: bool,
    output: &str,
) -> Result<()> {
    let Some(record) = repository.get(Some(name), &scope).await? else {
        return Err(SecretsError::not_found(name, scope).into());
    };

    let value = match (&record.value, show_value) {
        (Some(value), true) => value.expose_secret().to_string(),
        (Some(value), false) => value.to_string(),
        (None, _) => String::new(),
    };

    match output {
        "table" => {
            output::print_table_header(&[("Name", 30), ("Scope", 30), ("Value", 20)]);
            println!(
                "{:<30} {:<30} {}",
                truncate(&record.name, 28),
                truncate(&record.scope.label(), 28),
                value
            );
            println!();
        }
        _ if show_value => output::print_output(
            &RevealedSecret { name: &record.name, scope: &record.scope, value: &value },
            output,
        )?,
        _ => output::print_output(&record, output)?,
    }
    Ok(())
}

/// Create through the form; returns the trimmed name that was stored
pub async fn create_secret(
    repository: &SecretRepository,
    name: &str,
    scope: Scope,
    value: SecretString,
) -> Result<String> {
    let mut form = SecretFormController::create(repository.handle(), scope);
    form.set_name(name)?;
    form.set_value(value)?;

    match form.save().await? {
        Some(_) => Ok(form.draft().name().trim().to_string()),
        None => anyhow::bail!("{}", form.error_message().unwrap_or("Save failed")),
    }
}

/// Load the existing secret and replace only its value
pub async fn update_secret(
    repository: &SecretRepository,
    name: &str,
    scope: Scope,
    value: SecretString,
) -> Result<()> {
    let mut form = SecretFormController::edit(repository.handle(), name, scope);
    form.load().await;
    if let Some(message) = form.error_message() {
        anyhow::bail!("{}", message);
    }

    form.set_value(value)?;
    match form.save().await? {
        Some(_) => Ok(()),
        None => anyhow::bail!("{}", form.error_message().unwrap_or("Save failed")),
    }
}

/// Delete after `confirm` accepts the confirmation text.
///
/// Returns `false` when the confirmation was declined; nothing is sent then.
pub async fn delete_secret<F>(
    repository: &SecretRepository,
    name: &str,
    scope: Scope,
    confirm: F,
) -> Result<bool>
where
    F: FnOnce(&str) -> Result<bool>,
{
    let mut form = SecretFormController::edit(repository.handle(), name, scope);
    form.load().await;
    if let Some(message) = form.error_message() {
        anyhow::bail!("{}", message);
    }

    form.request_delete()?;
    if !confirm(&form.confirmation_message())? {
        form.cancel_delete();
        return Ok(false);
    }

    match form.delete().await? {
        Some(_) => Ok(true),
        None => anyhow::bail!("{}", form.error_message().unwrap_or("Delete failed")),
    }
}

fn prompt_confirmation(message: &str) -> Result<bool> {
    println!("{} (y/N)", message);
    let mut input = String::new();
    std::io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_secrets_table(view: &SecretListView) {
    if view.rows().is_empty() {
        println!("No secrets found ({})", view.scope().label());
        return;
    }

    println!();
    println!("{}", view.title());
    output::print_table_header(&[("Name", 40), ("Scope", 30)]);
    for row in view.rows() {
        println!("{:<40} {:<30}", truncate(&row.name, 38), truncate(&row.scope.label(), 28));
    }
    println!();
}
