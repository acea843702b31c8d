//! Reddit API client (client-credentials OAuth).

use std::time::Duration;

use rdash_core::{AppConfig, PostRecord};
use reqwest::{Client, Url};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::collector::PostSearch;
use crate::error::RedditError;
use crate::retry::retry_with_backoff;
use crate::types::{Listing, TokenResponse};

const DEFAULT_AUTH_BASE_URL: &str = "https://www.reddit.com";
const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";
/// Reddit caps a listing page at 100 items.
const MAX_PAGE_SIZE: usize = 100;
/// Refresh the token this long before Reddit says it expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Credentials and transport settings for [`RedditClient`].
#[derive(Clone)]
pub struct RedditClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl std::fmt::Debug for RedditClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

impl From<&AppConfig> for RedditClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            client_id: config.reddit_client_id.clone(),
            client_secret: config.reddit_client_secret.clone(),
            user_agent: config.reddit_user_agent.clone(),
            timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

struct AccessToken {
    value: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        self.expires_at.is_none_or(|at| Instant::now() < at)
    }
}

/// Reddit search client.
///
/// The access token is fetched on first use and refreshed when it expires
/// or the API rejects it. Use [`RedditClient::new`] for production or
/// [`RedditClient::with_base_urls`] to point at a mock server in tests.
pub struct RedditClient {
    client: Client,
    config: RedditClientConfig,
    auth_base: Url,
    api_base: Url,
    token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
    /// Creates a client pointed at the production Reddit endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the HTTP client cannot be built.
    pub fn new(config: RedditClientConfig) -> Result<Self, RedditError> {
        Self::with_base_urls(config, DEFAULT_AUTH_BASE_URL, DEFAULT_API_BASE_URL)
    }

    /// Creates a client with custom token and API base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the HTTP client cannot be built, or
    /// [`RedditError::InvalidBaseUrl`] if either URL does not parse.
    pub fn with_base_urls(
        config: RedditClientConfig,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, RedditError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            config,
            auth_base: parse_base(auth_base)?,
            api_base: parse_base(api_base)?,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, RedditError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    async fn fetch_token(&self) -> Result<AccessToken, RedditError> {
        let url = join(&self.auth_base, "api/v1/access_token")?;
        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedditError::Auth(format!(
                "token exchange failed with status {status}"
            )));
        }

        let body = response.text().await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| RedditError::Parse {
                context: "access token".to_string(),
                source: e,
            })?;

        tracing::debug!(expires_in = ?parsed.expires_in, "Reddit access token acquired");
        Ok(AccessToken {
            value: parsed.access_token,
            expires_at: parsed.expires_in.map(|secs| {
                Instant::now() + Duration::from_secs(secs).saturating_sub(TOKEN_EXPIRY_MARGIN)
            }),
        })
    }

    async fn clear_token(&self) {
        *self.token.lock().await = None;
    }

    async fn search_page(
        &self,
        subreddit: &str,
        query: &str,
        page_size: usize,
        after: Option<&str>,
    ) -> Result<Listing, RedditError> {
        let token = self.access_token().await?;
        let url = join(&self.api_base, &format!("r/{subreddit}/search"))?;

        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("restrict_sr", "true".to_string()),
            ("sort", "relevance".to_string()),
            ("t", "all".to_string()),
            ("type", "link".to_string()),
            ("limit", page_size.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(cursor) = after {
            params.push(("after", cursor.to_string()));
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_token().await;
        }
        if !status.is_success() {
            return Err(RedditError::Status {
                endpoint: format!("r/{subreddit}/search"),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RedditError::Parse {
            context: format!("search r/{subreddit}"),
            source: e,
        })
    }

    /// Search one subreddit, following `after` cursors until `limit` posts.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError`] once retries for a page are exhausted.
    pub async fn search_subreddit(
        &self,
        subreddit: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PostRecord>, RedditError> {
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE);
            let cursor = after.as_deref();
            let listing = retry_with_backoff(
                self.config.max_retries,
                self.config.backoff_base_ms,
                || self.search_page(subreddit, query, page_size, cursor),
            )
            .await?;

            let page_len = listing.data.children.len();
            posts.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .filter_map(|child| child.data.into_record(subreddit)),
            );

            after = listing.data.after;
            if after.is_none() || page_len == 0 {
                break;
            }
        }
        posts.truncate(limit);

        tracing::debug!(
            subreddit,
            query,
            posts = posts.len(),
            "Reddit search complete"
        );
        Ok(posts)
    }
}

impl PostSearch for RedditClient {
    async fn search(
        &self,
        source: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PostRecord>, RedditError> {
        self.search_subreddit(source, query, limit).await
    }
}

/// Ensure exactly one trailing slash so `Url::join` appends instead of
/// replacing the last path segment.
fn parse_base(raw: &str) -> Result<Url, RedditError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| RedditError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

fn join(base: &Url, path: &str) -> Result<Url, RedditError> {
    base.join(path).map_err(|e| RedditError::InvalidBaseUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RedditClientConfig {
        RedditClientConfig {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
            user_agent: "research/1.0".to_string(),
            timeout_secs: 5,
            max_retries: 0,
            backoff_base_ms: 0,
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let base = parse_base("http://localhost:1234/prefix").unwrap();
        let url = join(&base, "r/malaysia/search").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/prefix/r/malaysia/search");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = RedditClient::with_base_urls(config(), "not a url", "http://localhost");
        assert!(matches!(result, Err(RedditError::InvalidBaseUrl { .. })));
    }
}
