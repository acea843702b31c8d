use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub lexicon_path: PathBuf,
    pub model_dir: PathBuf,
    pub queries_path: Option<PathBuf>,
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    pub search_limit: usize,
    pub collection_cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub default_classifier_label: String,
    pub topic_similarity_threshold: f32,
    pub min_topic_size: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("lexicon_path", &self.lexicon_path)
            .field("model_dir", &self.model_dir)
            .field("queries_path", &self.queries_path)
            .field("reddit_client_id", &self.reddit_client_id)
            .field("reddit_client_secret", &"[redacted]")
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("search_limit", &self.search_limit)
            .field("collection_cache_ttl_secs", &self.collection_cache_ttl_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("default_classifier_label", &self.default_classifier_label)
            .field(
                "topic_similarity_threshold",
                &self.topic_similarity_threshold,
            )
            .field("min_topic_size", &self.min_topic_size)
            .finish()
    }
}
