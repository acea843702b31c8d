use std::collections::HashSet;
use std::future::Future;

use rdash_core::{PostRecord, QueryConfig};

use crate::error::RedditError;

/// Anything that can search one source for one query.
pub trait PostSearch: Send + Sync {
    /// Up to `limit` posts from `source` matching `query`.
    fn search(
        &self,
        source: &str,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PostRecord>, RedditError>> + Send;
}

/// A `(source, query)` pair that failed after retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub source: String,
    pub query: String,
    pub message: String,
}

/// Result of one collection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Posts in collection order, unique by id.
    pub posts: Vec<PostRecord>,
    pub failures: Vec<QueryFailure>,
}

/// Collect posts for every configured pair, skipping ids already seen.
///
/// Per-query failures are logged and skipped.
pub async fn collect_posts<S: PostSearch>(
    search: &S,
    queries: &QueryConfig,
    limit: usize,
) -> Vec<PostRecord> {
    collect_with_report(search, queries, limit).await.posts
}

/// Like [`collect_posts`], but also reports which pairs failed.
pub async fn collect_with_report<S: PostSearch>(
    search: &S,
    queries: &QueryConfig,
    limit: usize,
) -> Collection {
    let mut seen: HashSet<String> = HashSet::new();
    let mut collection = Collection::default();

    for (source, query) in queries.pairs() {
        match search.search(source, query, limit).await {
            Ok(batch) => {
                let fetched = batch.len();
                let before = collection.posts.len();
                collection
                    .posts
                    .extend(batch.into_iter().filter(|p| seen.insert(p.id.clone())));
                tracing::debug!(
                    subreddit = source,
                    query,
                    fetched,
                    new = collection.posts.len() - before,
                    "query collected"
                );
            }
            Err(e) => {
                tracing::warn!(
                    subreddit = source,
                    query,
                    error = %e,
                    "Reddit search failed, continuing with next query"
                );
                collection.failures.push(QueryFailure {
                    source: source.to_string(),
                    query: query.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        posts = collection.posts.len(),
        failed_queries = collection.failures.len(),
        "collection finished"
    );
    collection
}
