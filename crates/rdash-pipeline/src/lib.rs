//! Pipeline orchestration: collection, preprocessing, topic modeling, and
//! sentiment scoring driven as one explicit run-phase state machine.
//!
//! A run produces an immutable [`RunResult`]; [`aggregate`] and [`export`]
//! derive the display-ready views from it.

pub mod aggregate;
pub mod assets;
pub mod error;
pub mod export;
pub mod notice;
pub mod orchestrator;
pub mod phase;
pub mod run;

pub use aggregate::{SentimentDistribution, TopicSentiment};
pub use assets::NlpAssets;
pub use error::PipelineError;
pub use export::{to_csv, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
pub use notice::{Notice, NoticeLevel};
pub use orchestrator::{
    reddit_source, Orchestrator, PipelineEvent, PostSource, TopicModelFactory,
};
pub use phase::RunPhase;
pub use run::{RunResult, RunStatus};
