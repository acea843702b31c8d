use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reddit returned status {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Reddit authentication failed: {0}")]
    Auth(String),

    #[error("Reddit response parse error ({context}): {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
