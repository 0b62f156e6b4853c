//! Tiered redirect resolution.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::entities::{RedirectEntry, resolution_key};
use crate::domain::repositories::{RemoteError, RemoteStore};
use crate::domain::static_table::StaticTableHandle;
use crate::infrastructure::cache::LocalCache;

/// The source that answered a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Static,
    Cache,
    Remote,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Cache => "cache",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub entry: RedirectEntry,
    pub tier: Tier,
    /// Time spent in the remote store, zero unless `tier` is [`Tier::Remote`]
    /// or the lookup failed there.
    pub remote_elapsed: Duration,
}

/// Errors from [`ResolutionEngine::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No tier holds an entry for the key.
    #[error("no redirect for {key}")]
    NotFound { key: String },

    /// The remote store failed (transport or decode). Not retried.
    #[error("remote lookup for {key} failed: {source}")]
    Remote {
        key: String,
        #[source]
        source: RemoteError,
    },
}

/// Resolves `(prefix, path)` against the static table, the local cache and
/// the remote store, in that fixed order.
///
/// # Tiers
///
/// 1. **Static**: authoritative; a hit returns without touching the cache.
/// 2. **Cache**: memoized remote hits, keyed by `<prefix>:<path>`.
/// 3. **Remote**: on a hit the entry is cached for `cache_ttl`. Misses are
///    never cached, so every miss queries the store again.
///
/// Concurrent misses for the same key are not collapsed; each caller queries
/// the store and sets the cache independently.
pub struct ResolutionEngine {
    table: StaticTableHandle,
    cache: Arc<LocalCache>,
    store: Arc<dyn RemoteStore>,
    cache_ttl: Duration,
}

impl ResolutionEngine {
    pub fn new(
        table: StaticTableHandle,
        cache: Arc<LocalCache>,
        store: Arc<dyn RemoteStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            table,
            cache,
            store,
            cache_ttl,
        }
    }

    pub fn table(&self) -> &StaticTableHandle {
        &self.table
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    /// Resolves a request path for a site prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if no tier has an entry, and
    /// [`ResolveError::Remote`] if the remote store fails to answer or holds a
    /// malformed value.
    pub async fn resolve(&self, prefix: &str, path: &str) -> Result<Resolution, ResolveError> {
        if let Some(entry) = self.table.lookup(prefix, path) {
            return Ok(self.hit(entry, Tier::Static, Duration::ZERO));
        }

        let key = resolution_key(prefix, path);
        if let Some(entry) = self.cache.get(&key) {
            debug!("Local cache HIT: {}", key);
            return Ok(self.hit(entry, Tier::Cache, Duration::ZERO));
        }

        let started = tokio::time::Instant::now();
        let fetched = self.store.fetch(&key).await;
        let remote_elapsed = started.elapsed();

        match fetched {
            Ok(entry) => {
                self.cache.set(key, entry.clone(), self.cache_ttl);
                Ok(self.hit(entry, Tier::Remote, remote_elapsed))
            }
            Err(RemoteError::NotFound) => {
                metrics::counter!("redirect_resolutions_total", "outcome" => "not_found")
                    .increment(1);
                Err(ResolveError::NotFound { key })
            }
            Err(source) => {
                metrics::counter!("redirect_resolutions_total", "outcome" => "remote_error")
                    .increment(1);
                Err(ResolveError::Remote { key, source })
            }
        }
    }

    fn hit(&self, entry: RedirectEntry, tier: Tier, remote_elapsed: Duration) -> Resolution {
        metrics::counter!("redirect_resolutions_total", "outcome" => tier.as_str()).increment(1);
        Resolution {
            entry,
            tier,
            remote_elapsed,
        }
    }
}
