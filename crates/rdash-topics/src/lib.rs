//! Topic discovery, coherence scoring, summaries, and word clouds.

pub mod cluster;
pub mod coherence;
pub mod error;
pub mod model;
pub mod summary;
pub mod wordcloud;

pub use cluster::{ClusterParams, ClusterTopicModel};
pub use coherence::{coherence_cv, coherence_per_topic, COHERENCE_WINDOW};
pub use error::TopicError;
pub use model::{qualifying_topics, top_words, TopicModel, MIN_DOCUMENTS};
pub use summary::{summarize_topics, TopicSummary, DEFAULT_SUMMARY_DOCS, DEFAULT_SUMMARY_WORDS};
pub use wordcloud::{generate_word_cloud, CloudSkip, WordCloud, WordCloudImage};
