//! Keyed read cache shared by every repository and list view
//!
//! Entries are keyed by `(kind, scope)` for name lists and
//! `(kind, name, scope)` for single records. Entries expire after a TTL and
//! are dropped explicitly when a write or delete succeeds in their scope, so
//! a read after invalidation always goes back to the API.
//!
//! Each scope carries a generation that every invalidation bumps. A read
//! records the generation before it asks the API and is only cached if no
//! invalidation happened in between.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use super::types::{Scope, SecretRecord};

/// Cache key for one read query
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// `list(scope)`
    Secrets { scope: Scope },
    /// `get(name, scope)`
    Secret { name: String, scope: Scope },
}

impl CacheKey {
    pub fn secrets(scope: &Scope) -> Self {
        Self::Secrets { scope: scope.clone() }
    }

    pub fn secret(name: &str, scope: &Scope) -> Self {
        Self::Secret { name: name.to_string(), scope: scope.clone() }
    }

    pub fn scope(&self) -> &Scope {
        match self {
            Self::Secrets { scope } | Self::Secret { scope, .. } => scope,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Secrets { .. } => "secrets",
            Self::Secret { .. } => "secret",
        }
    }
}

/// Cached query result
#[derive(Debug, Clone, PartialEq)]
pub enum CachedRead {
    Names(Vec<String>),
    Record(Option<SecretRecord>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedRead,
    inserted_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    generations: HashMap<Scope, u64>,
}

impl CacheState {
    fn generation(&self, scope: &Scope) -> u64 {
        self.generations.get(scope).copied().unwrap_or(0)
    }
}

/// TTL cache with explicit invalidation.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheState>>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self { inner: Arc::new(RwLock::new(CacheState::default())), ttl }
    }

    /// Cache with the default TTL (5 minutes)
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(300))
    }

    /// Fresh entry for `key`, if any
    pub async fn get(&self, key: &CacheKey) -> Option<CachedRead> {
        let state = self.inner.read().await;
        let entry = state.entries.get(key)?;

        if entry.inserted_at.elapsed() < self.ttl {
            debug!(kind = key.kind(), scope = %key.scope(), "Cache hit");
            Some(entry.value.clone())
        } else {
            debug!(kind = key.kind(), scope = %key.scope(), "Cache entry expired");
            None
        }
    }

    /// Current invalidation generation of `scope`.
    ///
    /// Read it before issuing the request whose result goes to
    /// [`insert_if_current`](Self::insert_if_current).
    pub async fn generation(&self, scope: &Scope) -> u64 {
        self.inner.read().await.generation(scope)
    }

    /// Cache `value` unless the scope of `key` was invalidated after
    /// `generation` was read. Returns whether the value was stored.
    ///
    /// Expired entries are pruned on every store.
    pub async fn insert_if_current(
        &self,
        key: CacheKey,
        value: CachedRead,
        generation: u64,
    ) -> bool {
        let mut state = self.inner.write().await;

        if state.generation(key.scope()) != generation {
            debug!(kind = key.kind(), scope = %key.scope(), "Discarding stale read");
            return false;
        }

        let ttl = self.ttl;
        state.entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);

        debug!(kind = key.kind(), scope = %key.scope(), "Caching read");
        state.entries.insert(key, CacheEntry { value, inserted_at: Instant::now() });
        true
    }

    /// Drop every entry (list and detail) belonging to `scope` and bump its
    /// generation so reads already in flight are not cached.
    pub async fn invalidate_scope(&self, scope: &Scope) {
        let mut state = self.inner.write().await;
        let before = state.entries.len();
        state.entries.retain(|key, _| key.scope() != scope);
        let removed = before - state.entries.len();
        *state.generations.entry(scope.clone()).or_insert(0) += 1;
        debug!(scope = %scope, removed, "Invalidated scope");
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
