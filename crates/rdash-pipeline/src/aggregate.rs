//! Display-ready counts over a finished table.

use std::collections::{BTreeMap, BTreeSet};

use rdash_core::{AnalysisRow, TopicId, OUTLIER_TOPIC};
use serde::Serialize;

/// Classifier-label counts for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSentiment {
    pub topic: TopicId,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    /// Classifier label → rows.
    pub overall: BTreeMap<String, usize>,
    /// Lexicon label → rows.
    pub lexicon: BTreeMap<String, usize>,
    /// Empty unless the table has at least two distinct topics.
    pub by_topic: Vec<TopicSentiment>,
}

impl SentimentDistribution {
    pub fn from_rows(rows: &[AnalysisRow]) -> Self {
        let distinct: BTreeSet<TopicId> = rows.iter().map(|r| r.topic).collect();
        Self {
            overall: classifier_counts(rows),
            lexicon: lexicon_counts(rows),
            by_topic: if distinct.len() > 1 {
                classifier_counts_by_topic(rows)
            } else {
                Vec::new()
            },
        }
    }
}

pub fn classifier_counts(rows: &[AnalysisRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.classifier_label.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn lexicon_counts(rows: &[AnalysisRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts
            .entry(row.lexicon_label.as_str().to_string())
            .or_insert(0) += 1;
    }
    counts
}

/// Count of each classifier label per topic, outliers included.
///
/// Every topic lists every label seen anywhere in the table, zero-filled.
pub fn classifier_counts_by_topic(rows: &[AnalysisRow]) -> Vec<TopicSentiment> {
    let labels: BTreeSet<&str> = rows.iter().map(|r| r.classifier_label.as_str()).collect();
    let mut by_topic: BTreeMap<TopicId, BTreeMap<String, usize>> = BTreeMap::new();
    for row in rows {
        let counts = by_topic.entry(row.topic).or_insert_with(|| {
            labels.iter().map(|l| ((*l).to_string(), 0)).collect()
        });
        *counts.entry(row.classifier_label.clone()).or_insert(0) += 1;
    }
    by_topic
        .into_iter()
        .map(|(topic, counts)| TopicSentiment { topic, counts })
        .collect()
}

/// Non-outlier topic ids present in the table, ascending.
pub fn selector_topics(rows: &[AnalysisRow]) -> Vec<TopicId> {
    rows.iter()
        .map(|r| r.topic)
        .filter(|t| *t != OUTLIER_TOPIC)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use rdash_core::PostRecord;

    use super::*;

    fn row(topic: TopicId, label: &str, score: i32) -> AnalysisRow {
        let post = PostRecord {
            id: format!("{topic}-{label}-{score}"),
            source: "malaysia".to_string(),
            text: "text".to_string(),
            created_utc: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let mut row = AnalysisRow::new(&post, "text".to_string());
        row.topic = topic;
        row.classifier_label = label.to_string();
        row.set_lexicon_score(score);
        row
    }

    fn table() -> Vec<AnalysisRow> {
        vec![
            row(0, "positive", 2),
            row(0, "negative", -1),
            row(1, "positive", 0),
            row(-1, "neutral", 0),
            row(0, "positive", 1),
        ]
    }

    #[test]
    fn overall_counts_by_classifier_label() {
        let counts = classifier_counts(&table());
        assert_eq!(counts["positive"], 3);
        assert_eq!(counts["negative"], 1);
        assert_eq!(counts["neutral"], 1);
    }

    #[test]
    fn lexicon_counts_follow_score_sign() {
        let counts = lexicon_counts(&table());
        assert_eq!(counts["positive"], 2);
        assert_eq!(counts["negative"], 1);
        assert_eq!(counts["neutral"], 2);
    }

    #[test]
    fn per_topic_counts_are_zero_filled() {
        let by_topic = classifier_counts_by_topic(&table());
        let ids: Vec<TopicId> = by_topic.iter().map(|t| t.topic).collect();
        assert_eq!(ids, vec![-1, 0, 1]);

        let topic_one = &by_topic[2];
        assert_eq!(topic_one.counts["positive"], 1);
        assert_eq!(topic_one.counts["negative"], 0);
        assert_eq!(topic_one.counts["neutral"], 0);
    }

    #[test]
    fn single_topic_table_has_no_breakdown() {
        let rows = vec![row(-1, "neutral", 0), row(-1, "positive", 1)];
        let dist = SentimentDistribution::from_rows(&rows);
        assert!(dist.by_topic.is_empty());
        assert_eq!(dist.overall.len(), 2);
    }

    #[test]
    fn selector_excludes_outliers() {
        assert_eq!(selector_topics(&table()), vec![0, 1]);
        assert!(selector_topics(&[row(-1, "neutral", 0)]).is_empty());
    }
}
