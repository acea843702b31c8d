use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic identifier assigned by topic discovery.
pub type TopicId = i32;

/// Reserved id for documents that belong to no coherent topic.
pub const OUTLIER_TOPIC: TopicId = -1;

/// A ranked keyword and its weight within a topic.
pub type TopicWord = (String, f64);

/// One collected post. Immutable once collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Source-provided unique identifier, used for deduplication.
    pub id: String,
    /// Subreddit the post was found in.
    pub source: String,
    /// Title and body joined by a single space.
    pub text: String,
    pub created_utc: DateTime<Utc>,
}

/// Three-way lexicon sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Label by the sign of a summed polarity score.
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        match score.signum() {
            1 => Self::Positive,
            -1 => Self::Negative,
            _ => Self::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the analysis table: a post plus every derived column.
///
/// Rows are created at preprocessing with neutral defaults for the columns
/// later stages fill in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub source: String,
    pub text: String,
    pub created_utc: DateTime<Utc>,
    pub text_clean: String,
    pub tokens: Vec<String>,
    pub topic: TopicId,
    pub lexicon_score: i32,
    pub lexicon_label: SentimentLabel,
    pub classifier_label: String,
}

impl AnalysisRow {
    /// Start a row from a collected post and its cleaned text.
    #[must_use]
    pub fn new(post: &PostRecord, text_clean: String) -> Self {
        let tokens = text_clean.split_whitespace().map(str::to_string).collect();
        Self {
            source: post.source.clone(),
            text: post.text.clone(),
            created_utc: post.created_utc,
            text_clean,
            tokens,
            topic: OUTLIER_TOPIC,
            lexicon_score: 0,
            lexicon_label: SentimentLabel::Neutral,
            classifier_label: String::new(),
        }
    }

    /// Set the lexicon score and the label derived from it together.
    pub fn set_lexicon_score(&mut self, score: i32) {
        self.lexicon_score = score;
        self.lexicon_label = SentimentLabel::from_score(score);
    }
}
