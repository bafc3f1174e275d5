//! HTTP client for the orchestration platform API
//!
//! Thin wrapper over reqwest that joins paths onto the configured base URL,
//! attaches the bearer token when one is configured and turns non-success
//! responses into [`SecretsError::Http`] carrying the server's message.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use crate::secrets::error::{Result, SecretsError};
use crate::secrets::SecretString;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Optional bearer token
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Log response bodies at trace level
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            token: None,
            timeout: 30,
            verbose: false,
        }
    }
}

/// Client for the platform REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| SecretsError::config(format!("Failed to build HTTP client: {}", e)))?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Build a GET request
    pub fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {}", url);
        self.authorize(self.client.get(&url))
    }

    /// Build a PUT request
    pub fn put(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("PUT {}", url);
        self.authorize(self.client.put(&url))
    }

    /// Build a DELETE request
    pub fn delete(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("DELETE {}", url);
        self.authorize(self.client.delete(&url))
    }

    /// Send a GET request and deserialize the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).send().await?;
        let body = self.check(response).await?;
        self.decode(&body)
    }

    /// Send a GET request; a 404 resolves to `None`
    pub async fn get_optional_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self.get(path).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Response status: 404, treating as absent");
            return Ok(None);
        }
        let body = self.check(response).await?;
        self.decode(&body).map(Some)
    }

    /// Send a PUT request with a JSON body, ignoring any response body
    pub async fn put_json<T: Serialize>(&self, path: &str, body: &T) -> Result<()> {
        let response = self.put(path).json(body).send().await?;
        self.check(response).await?;
        Ok(())
    }

    /// Send a DELETE request, ignoring any response body
    pub async fn delete_no_content(&self, path: &str) -> Result<()> {
        let response = self.delete(path).send().await?;
        self.check(response).await?;
        Ok(())
    }

    /// Check the status and return the body text
    async fn check(&self, response: Response) -> Result<String> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            // An unreadable error body leaves the caller's fallback text in place
            let body = response.text().await.unwrap_or_default();
            if self.config.verbose {
                trace!("Error response:\n{}", body);
            }
            return Err(SecretsError::http(status.as_u16(), error_message(&body)));
        }

        let body = response.text().await?;
        if self.config.verbose {
            trace!("Response body:\n{}", body);
        }

        Ok(body)
    }

    fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(SecretsError::from)
    }
}

/// Extract a human readable message from an error body.
///
/// The platform answers errors with `{"message": "..."}`; anything else that is
/// not blank is passed through as-is.
pub fn error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string()).filter(|m| !m.trim().is_empty());
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
