//! Remote secret API seam.
//!
//! [`SecretsApi`] is the collaborator the repository talks to. The HTTP
//! implementation follows the platform contract:
//!
//! - `GET /secrets[?workflowName=]` → `["name", ...]`
//! - `GET /secrets/{name}[?workflowName=]` → `{"name": ..., "value": ...}` or 404
//! - `GET /secrets/{name}/exists[?workflowName=]` → `{"exists": bool}`
//! - `PUT /secrets/{name}[?workflowName=]` with `{"value": ...}`
//! - `DELETE /secrets/{name}[?workflowName=]`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::Result;
use super::path;
use super::types::{Scope, SecretRecord, SecretString};
use crate::client::ApiClient;

/// Scoped CRUD operations exposed by the remote secret store.
///
/// Implementations MUST NOT log secret values.
#[async_trait]
pub trait SecretsApi: Send + Sync {
    /// Names of all secrets in `scope`. Values are never included.
    async fn list_names(&self, scope: &Scope) -> Result<Vec<String>>;

    /// Metadata for one secret, `None` when it does not exist.
    async fn get_secret(&self, name: &str, scope: &Scope) -> Result<Option<SecretRecord>>;

    /// Create or replace the secret's value.
    async fn put_secret(&self, name: &str, value: &SecretString, scope: &Scope) -> Result<()>;

    /// Remove the secret.
    async fn delete_secret(&self, name: &str, scope: &Scope) -> Result<()>;

    /// Whether the secret exists.
    async fn secret_exists(&self, name: &str, scope: &Scope) -> Result<bool> {
        Ok(self.get_secret(name, scope).await?.is_some())
    }
}

/// Request body for `PUT /secrets/{name}`
#[derive(Serialize)]
struct PutSecretRequest<'a> {
    value: &'a str,
}

/// Response body for `GET /secrets/{name}`
#[derive(Deserialize)]
struct SecretResponse {
    name: Option<String>,
    value: Option<SecretString>,
}

/// Response body for `GET /secrets/{name}/exists`
#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

/// [`SecretsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSecretsApi {
    client: ApiClient,
}

impl HttpSecretsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl SecretsApi for HttpSecretsApi {
    async fn list_names(&self, scope: &Scope) -> Result<Vec<String>> {
        self.client.get_json(&path::list_path(scope)).await
    }

    async fn get_secret(&self, name: &str, scope: &Scope) -> Result<Option<SecretRecord>> {
        let path = path::secret_path(name, scope)?;
        let response: Option<SecretResponse> = self.client.get_optional_json(&path).await?;

        Ok(response.map(|body| SecretRecord {
            name: body.name.unwrap_or_else(|| name.to_string()),
            scope: scope.clone(),
            value: body.value,
        }))
    }

    async fn put_secret(&self, name: &str, value: &SecretString, scope: &Scope) -> Result<()> {
        let path = path::secret_path(name, scope)?;
        let body = PutSecretRequest { value: value.expose_secret() };
        self.client.put_json(&path, &body).await
    }

    async fn delete_secret(&self, name: &str, scope: &Scope) -> Result<()> {
        let path = path::secret_path(name, scope)?;
        self.client.delete_no_content(&path).await
    }

    async fn secret_exists(&self, name: &str, scope: &Scope) -> Result<bool> {
        let path = path::exists_path(name, scope)?;
        let response: ExistsResponse = self.client.get_json(&path).await?;
        Ok(response.exists)
    }
}
