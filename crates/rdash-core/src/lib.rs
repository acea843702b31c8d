//! Shared data model and configuration for the rdash workspace.

pub mod app_config;
pub mod config;
pub mod degrade;
pub mod error;
pub mod queries;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use degrade::Degradable;
pub use error::ConfigError;
pub use queries::{load_queries, QueryConfig};
pub use types::{AnalysisRow, PostRecord, SentimentLabel, TopicId, TopicWord, OUTLIER_TOPIC};
