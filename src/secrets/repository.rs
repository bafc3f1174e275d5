//! Scoped secret repository
//!
//! Wraps a [`SecretsApi`] with the shared [`QueryCache`] and reports request
//! status (in-flight count, last error) so views can reflect pending work.
//!
//! Reads go through the cache; successful writes and deletes invalidate every
//! cached read of the affected scope. A read that was in flight while its
//! scope was invalidated is returned to its caller but not cached.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use super::api::SecretsApi;
use super::cache::{CacheKey, CachedRead, QueryCache};
use super::error::Result;
use super::types::{Scope, SecretRecord, SecretString};

/// Request status of one repository handle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    /// Requests issued and not yet resolved
    pub in_flight: usize,
    /// Message of the most recent failure, cleared by the next success
    pub last_error: Option<String>,
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }
}

/// Decrements the in-flight count when the request resolves or is dropped.
struct InFlight {
    status: Arc<watch::Sender<RequestStatus>>,
}

impl InFlight {
    fn start(status: &Arc<watch::Sender<RequestStatus>>) -> Self {
        status.send_modify(|s| s.in_flight += 1);
        Self { status: Arc::clone(status) }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.status.send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}

/// Scoped CRUD over the remote secret API.
///
/// Cloning yields a handle that shares the API, the cache and the status.
#[derive(Clone)]
pub struct SecretRepository {
    api: Arc<dyn SecretsApi>,
    cache: QueryCache,
    status: Arc<watch::Sender<RequestStatus>>,
}

impl SecretRepository {
    pub fn new(api: Arc<dyn SecretsApi>, cache: QueryCache) -> Self {
        let (status, _) = watch::channel(RequestStatus::default());
        Self { api, cache, status: Arc::new(status) }
    }

    /// New handle over the same API and cache with its own request status.
    ///
    /// Each form gets one so that its pending flag only reflects its own work.
    pub fn handle(&self) -> Self {
        Self::new(Arc::clone(&self.api), self.cache.clone())
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Snapshot of the current request status
    pub fn status(&self) -> RequestStatus {
        self.status.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.status.borrow().is_pending()
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<RequestStatus> {
        self.status.subscribe()
    }

    /// Names of the secrets visible in `scope`
    pub async fn list(&self, scope: &Scope) -> Result<Vec<String>> {
        let key = CacheKey::secrets(scope);
        if let Some(CachedRead::Names(names)) = self.cache.get(&key).await {
            return Ok(names);
        }

        let generation = self.cache.generation(scope).await;
        let names = self.track("list", scope, self.api.list_names(scope)).await?;
        self.cache.insert_if_current(key, CachedRead::Names(names.clone()), generation).await;
        Ok(names)
    }

    /// Metadata for one secret.
    ///
    /// Without a name (the create flow) this resolves to `None` and issues no
    /// request.
    pub async fn get(&self, name: Option<&str>, scope: &Scope) -> Result<Option<SecretRecord>> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(None);
        };

        let key = CacheKey::secret(name, scope);
        if let Some(CachedRead::Record(record)) = self.cache.get(&key).await {
            return Ok(record);
        }

        let generation = self.cache.generation(scope).await;
        let record = self.track("get", scope, self.api.get_secret(name, scope)).await?;
        self.cache.insert_if_current(key, CachedRead::Record(record.clone()), generation).await;
        Ok(record)
    }

    /// Whether the secret exists. Always asks the API.
    pub async fn exists(&self, name: &str, scope: &Scope) -> Result<bool> {
        self.track("exists", scope, self.api.secret_exists(name, scope)).await
    }

    /// Create or replace a secret, then invalidate reads of its scope
    pub async fn save(&self, name: &str, value: &SecretString, scope: &Scope) -> Result<()> {
        self.track("save", scope, self.api.put_secret(name, value, scope)).await?;
        self.cache.invalidate_scope(scope).await;
        info!(name = %name, scope = %scope, "Secret saved");
        Ok(())
    }

    /// Delete a secret, then invalidate reads of its scope
    pub async fn delete(&self, name: &str, scope: &Scope) -> Result<()> {
        self.track("delete", scope, self.api.delete_secret(name, scope)).await?;
        self.cache.invalidate_scope(scope).await;
        info!(name = %name, scope = %scope, "Secret deleted");
        Ok(())
    }

    async fn track<T, F>(&self, operation: &'static str, scope: &Scope, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let span = tracing::debug_span!(
            "secret_request",
            operation = operation,
            scope = %scope,
            request_id = %Uuid::new_v4()
        );

        let _in_flight = InFlight::start(&self.status);
        let result = request.instrument(span).await;

        match &result {
            Ok(_) => {
                debug!(operation, scope = %scope, "Request succeeded");
                self.status.send_modify(|s| s.last_error = None);
            }
            Err(e) => {
                warn!(operation, scope = %scope, error = %e, "Request failed");
                let message = e.to_string();
                self.status.send_modify(|s| s.last_error = Some(message));
            }
        }

        result
    }
}

impl std::fmt::Debug for SecretRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRepository")
            .field("cache_ttl", &self.cache.ttl())
            .field("status", &self.status())
            .finish()
    }
}
