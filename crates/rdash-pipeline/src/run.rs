//! The published result of one pipeline run.

use chrono::{DateTime, Utc};
use rdash_core::{AnalysisRow, TopicId, OUTLIER_TOPIC};
use rdash_topics::{
    generate_word_cloud, summarize_topics, CloudSkip, TopicModel, TopicSummary, WordCloud,
    WordCloudImage, DEFAULT_SUMMARY_DOCS, DEFAULT_SUMMARY_WORDS,
};
use serde::Serialize;

use crate::aggregate::{selector_topics, SentimentDistribution};
use crate::export::to_csv;
use crate::notice::Notice;
use crate::phase::RunPhase;
use crate::PipelineError;

/// Everything one run produced. Immutable once published.
pub struct RunResult {
    /// Increases by one per run.
    pub version: u64,
    /// `Complete` or `Halted`.
    pub phase: RunPhase,
    pub completed: bool,
    pub table: Vec<AnalysisRow>,
    /// The fitted model, absent when topic modeling was skipped or failed.
    pub topic_model: Option<Box<dyn TopicModel>>,
    pub coherence: f64,
    /// Token lists the coherence score was computed against.
    pub coherence_corpus: Vec<Vec<String>>,
    pub notices: Vec<Notice>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl std::fmt::Debug for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunResult")
            .field("version", &self.version)
            .field("phase", &self.phase)
            .field("completed", &self.completed)
            .field("rows", &self.table.len())
            .field("has_topic_model", &self.topic_model.is_some())
            .field("coherence", &self.coherence)
            .field("notices", &self.notices)
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish_non_exhaustive()
    }
}

impl RunResult {
    /// Topic table with default keyword and sample counts.
    pub fn topic_summaries(&self) -> Vec<TopicSummary> {
        match &self.topic_model {
            Some(model) => summarize_topics(
                model.as_ref(),
                &self.table,
                DEFAULT_SUMMARY_WORDS,
                DEFAULT_SUMMARY_DOCS,
            ),
            None => Vec::new(),
        }
    }

    /// Topic ids offered for word clouds and breakdowns.
    pub fn selector_topics(&self) -> Vec<TopicId> {
        selector_topics(&self.table)
    }

    pub fn sentiment(&self) -> SentimentDistribution {
        SentimentDistribution::from_rows(&self.table)
    }

    /// # Errors
    ///
    /// Returns a [`CloudSkip`] explaining why no image exists for `topic`.
    pub fn word_cloud(
        &self,
        topic: TopicId,
        options: &WordCloud,
    ) -> Result<WordCloudImage, CloudSkip> {
        match &self.topic_model {
            Some(model) => generate_word_cloud(model.as_ref(), topic, options),
            None if topic == OUTLIER_TOPIC => Err(CloudSkip::OutlierTopic),
            None => Err(CloudSkip::UnknownTopic(topic)),
        }
    }

    /// # Errors
    ///
    /// Returns [`PipelineError`] if CSV serialization fails.
    pub fn export_csv(&self) -> Result<Vec<u8>, PipelineError> {
        to_csv(&self.table)
    }

    pub fn status(&self) -> RunStatus {
        RunStatus {
            version: self.version,
            phase: self.phase,
            completed: self.completed,
            rows: self.table.len(),
            topics: self.selector_topics().len(),
            coherence: self.coherence,
            notices: self.notices.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Serializable overview of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatus {
    pub version: u64,
    pub phase: RunPhase,
    pub completed: bool,
    pub rows: usize,
    /// Non-outlier topics present in the table.
    pub topics: usize,
    pub coherence: f64,
    pub notices: Vec<Notice>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halted() -> RunResult {
        let now = Utc::now();
        RunResult {
            version: 3,
            phase: RunPhase::Halted,
            completed: false,
            table: Vec::new(),
            topic_model: None,
            coherence: 0.0,
            coherence_corpus: Vec::new(),
            notices: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn halted_run_has_empty_views() {
        let run = halted();
        assert!(run.topic_summaries().is_empty());
        assert!(run.selector_topics().is_empty());
        assert!(run.sentiment().overall.is_empty());
        assert_eq!(run.status().rows, 0);
        assert_eq!(run.status().phase, RunPhase::Halted);
    }

    #[test]
    fn word_cloud_without_model() {
        let run = halted();
        assert_eq!(
            run.word_cloud(-1, &WordCloud::default()).unwrap_err(),
            CloudSkip::OutlierTopic
        );
        assert_eq!(
            run.word_cloud(0, &WordCloud::default()).unwrap_err(),
            CloudSkip::UnknownTopic(0)
        );
    }

    #[test]
    fn debug_omits_table_contents() {
        let rendered = format!("{:?}", halted());
        assert!(rendered.contains("version: 3"));
        assert!(rendered.contains("rows: 0"));
    }
}
