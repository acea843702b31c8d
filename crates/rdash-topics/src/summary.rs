use rdash_core::{AnalysisRow, TopicId};
use serde::Serialize;

use crate::model::{qualifying_topics, top_words, TopicModel};

pub const DEFAULT_SUMMARY_WORDS: usize = 10;
pub const DEFAULT_SUMMARY_DOCS: usize = 1;

/// One row of the topic table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    pub topic: TopicId,
    /// Keywords joined by `", "`.
    pub top_keywords: String,
    /// Raw text of the first rows assigned to the topic.
    pub samples: Vec<String>,
    /// Number of rows assigned to the topic.
    pub count: usize,
}

impl TopicSummary {
    /// First sample, or empty when the topic has no rows.
    #[must_use]
    pub fn sample_text(&self) -> &str {
        self.samples.first().map_or("", String::as_str)
    }
}

/// Summarize every non-outlier topic, ascending by id.
///
/// A model with no topics yields an empty table.
pub fn summarize_topics(
    model: &dyn TopicModel,
    rows: &[AnalysisRow],
    n_words: usize,
    n_docs: usize,
) -> Vec<TopicSummary> {
    qualifying_topics(model)
        .into_iter()
        .map(|topic| {
            let assigned = rows.iter().filter(|r| r.topic == topic);
            TopicSummary {
                topic,
                top_keywords: top_words(model, topic, n_words).join(", "),
                samples: assigned.clone().take(n_docs).map(|r| r.text.clone()).collect(),
                count: assigned.count(),
            }
        })
        .collect()
}
