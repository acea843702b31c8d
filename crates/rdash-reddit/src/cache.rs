//! Time-bounded memo of the last collection.

use std::time::Duration;

use rdash_core::QueryConfig;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::collector::{collect_with_report, Collection, PostSearch};

/// Wraps a [`PostSearch`] and reuses the last non-empty collection until
/// `ttl` elapses.
///
/// The query configuration is fixed at construction, so it is the only key.
/// Concurrent callers serialise on the cache lock and share one fetch.
pub struct CachedCollector<S> {
    search: S,
    queries: QueryConfig,
    limit: usize,
    ttl: Duration,
    cache: Mutex<Option<(Instant, Collection)>>,
}

impl<S: PostSearch> CachedCollector<S> {
    pub fn new(search: S, queries: QueryConfig, limit: usize, ttl: Duration) -> Self {
        Self {
            search,
            queries,
            limit,
            ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn queries(&self) -> &QueryConfig {
        &self.queries
    }

    /// The cached collection if still fresh, otherwise a new one.
    ///
    /// Empty collections are returned but never stored.
    pub async fn collect(&self) -> Collection {
        let mut guard = self.cache.lock().await;
        if let Some((fetched_at, collection)) = guard.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                tracing::debug!(
                    posts = collection.posts.len(),
                    age_secs = fetched_at.elapsed().as_secs(),
                    "serving cached collection"
                );
                return collection.clone();
            }
        }

        let collection = collect_with_report(&self.search, &self.queries, self.limit).await;
        *guard = if collection.posts.is_empty() || self.ttl.is_zero() {
            None
        } else {
            Some((Instant::now(), collection.clone()))
        };
        collection
    }

    /// Drop the cached collection so the next [`collect`](Self::collect)
    /// refetches.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }
}
