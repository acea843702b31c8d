//! Reddit post collection.
//!
//! [`RedditClient`] talks to the Reddit OAuth API with client credentials.
//! [`collect_posts`] walks every configured subreddit × query pair through
//! any [`PostSearch`] implementation, deduplicating by post id, and
//! [`CachedCollector`] keeps the last collection for a bounded time.

pub mod cache;
pub mod client;
pub mod collector;
pub mod error;
pub mod types;

mod retry;

pub use cache::CachedCollector;
pub use client::{RedditClient, RedditClientConfig};
pub use collector::{collect_posts, collect_with_report, Collection, PostSearch, QueryFailure};
pub use error::RedditError;
