//! Scoped request paths for the secret API.
//!
//! The global namespace is the unscoped path. A workflow scope adds
//! `?workflowName=<percent-encoded>`; other tools hitting the same API rely on
//! exactly this shape.

use super::error::{Result, SecretsError};
use super::types::Scope;

const SECRETS_BASE: &str = "/secrets";

/// Append the scope query parameter to `base` when the scope is a workflow.
pub fn scoped(base: &str, scope: &Scope) -> String {
    match scope.workflow_name() {
        Some(workflow) => format!("{}?workflowName={}", base, urlencoding::encode(workflow)),
        None => base.to_string(),
    }
}

/// `GET /secrets[?workflowName=]`
pub fn list_path(scope: &Scope) -> String {
    scoped(SECRETS_BASE, scope)
}

/// `/secrets/{name}[?workflowName=]` for get, put and delete.
pub fn secret_path(name: &str, scope: &Scope) -> Result<String> {
    let segment = name_segment(name)?;
    Ok(scoped(&format!("{}/{}", SECRETS_BASE, segment), scope))
}

/// `GET /secrets/{name}/exists[?workflowName=]`
pub fn exists_path(name: &str, scope: &Scope) -> Result<String> {
    let segment = name_segment(name)?;
    Ok(scoped(&format!("{}/{}/exists", SECRETS_BASE, segment), scope))
}

fn name_segment(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(SecretsError::invalid_name(name, "name must not be empty"));
    }
    Ok(urlencoding::encode(name).into_owned())
}
