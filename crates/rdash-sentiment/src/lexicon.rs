//! Word-polarity lexicon scorer.

use std::collections::HashMap;
use std::path::Path;

use rdash_core::SentimentLabel;

use crate::SentimentError;

/// Static word → integer polarity dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: HashMap<String, i32>,
}

impl Lexicon {
    /// Parse `word polarity` lines.
    ///
    /// Only lines with exactly two whitespace-separated fields whose second
    /// field is an integer are kept. Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for (line_no, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [word, polarity] = fields.as_slice() else {
                if !fields.is_empty() {
                    tracing::debug!(line = line_no + 1, "skipping lexicon line without two fields");
                }
                continue;
            };
            match polarity.parse::<i32>() {
                Ok(p) => {
                    entries.insert((*word).to_string(), p);
                }
                Err(_) => {
                    tracing::debug!(
                        line = line_no + 1,
                        "skipping lexicon line with non-integer polarity"
                    );
                }
            }
        }
        Self { entries }
    }

    /// Read and parse a lexicon file.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::MissingAsset`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, SentimentError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SentimentError::MissingAsset {
                path: path.display().to_string(),
                source: e,
            })?;
        let lexicon = Self::parse(&content);
        tracing::info!(path = %path.display(), entries = lexicon.len(), "lexicon loaded");
        Ok(lexicon)
    }

    /// Sum of polarities over `tokens`; unknown words count 0.
    #[must_use]
    pub fn score(&self, tokens: &[String]) -> i32 {
        tokens
            .iter()
            .filter_map(|t| self.entries.get(t))
            .fold(0_i32, |acc, p| acc.saturating_add(*p))
    }

    /// Score and label together.
    #[must_use]
    pub fn score_and_label(&self, tokens: &[String]) -> (i32, SentimentLabel) {
        let score = self.score(tokens);
        (score, SentimentLabel::from_score(score))
    }

    #[must_use]
    pub fn polarity(&self, word: &str) -> Option<i32> {
        self.entries.get(word).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
