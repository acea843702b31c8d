//! TF-IDF + linear classifier sentiment pipeline.
//!
//! The three collaborators sit behind narrow traits so a run can swap in
//! any model that maps documents to label strings. The concrete types load
//! from JSON artifacts exported from a trained model.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::SentimentError;

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("TOKEN_REGEX: invalid pattern"));

/// Feature index → value, sorted by index.
pub type SparseVector = Vec<(usize, f32)>;

pub trait Vectorizer: Send + Sync {
    fn transform(&self, docs: &[String]) -> Vec<SparseVector>;
}

pub trait Classifier: Send + Sync {
    /// Predicted class index per row.
    fn predict(&self, rows: &[SparseVector]) -> Vec<usize>;
}

pub trait LabelDecoder: Send + Sync {
    /// Map class indices back to label strings.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::UnknownClass`] for an index with no label.
    fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<String>, SentimentError>;
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Fitted TF-IDF vocabulary and inverse document frequencies.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
}

impl TfidfVectorizer {
    /// Build a vectorizer and check that every vocabulary index has an IDF.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::ShapeMismatch`] on inconsistent shapes.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Result<Self, SentimentError> {
        let vectorizer = Self {
            vocabulary,
            idf,
            sublinear_tf: false,
            lowercase: true,
            ngram_range: (1, 1),
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    #[must_use]
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    #[must_use]
    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Self {
        self.ngram_range = (min.max(1), max.max(min.max(1)));
        self
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    fn validate(&self) -> Result<(), SentimentError> {
        if let Some((term, idx)) = self.vocabulary.iter().find(|(_, i)| **i >= self.idf.len()) {
            return Err(SentimentError::ShapeMismatch(format!(
                "term '{term}' has index {idx} but idf has {} entries",
                self.idf.len()
            )));
        }
        let (min, max) = self.ngram_range;
        if min == 0 || min > max {
            return Err(SentimentError::ShapeMismatch(format!(
                "invalid ngram_range ({min}, {max})"
            )));
        }
        Ok(())
    }

    fn terms(&self, doc: &str) -> Vec<String> {
        let text = if self.lowercase {
            doc.to_lowercase()
        } else {
            doc.to_string()
        };
        let words: Vec<&str> = TOKEN_REGEX.find_iter(&text).map(|m| m.as_str()).collect();
        let (min, max) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min..=max {
            if n > words.len() {
                break;
            }
            terms.extend(words.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    fn transform_one(&self, doc: &str) -> SparseVector {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in self.terms(doc) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let mut row: SparseVector = counts
            .into_iter()
            .map(|(idx, count)| {
                let count = count as f32;
                let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
                (idx, tf * self.idf[idx])
            })
            .collect();
        row.sort_by_key(|(idx, _)| *idx);

        let norm = row.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut row {
                *v /= norm;
            }
        }
        row
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, docs: &[String]) -> Vec<SparseVector> {
        docs.iter().map(|d| self.transform_one(d)).collect()
    }
}

/// One-vs-rest linear model. A single coefficient row is treated as a
/// binary model whose positive decision selects class 1.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
}

impl LinearClassifier {
    /// # Errors
    ///
    /// Returns [`SentimentError::ShapeMismatch`] on inconsistent shapes.
    pub fn new(coef: Vec<Vec<f32>>, intercept: Vec<f32>) -> Result<Self, SentimentError> {
        let classifier = Self { coef, intercept };
        classifier.validate()?;
        Ok(classifier)
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<(), SentimentError> {
        if self.coef.is_empty() {
            return Err(SentimentError::ShapeMismatch(
                "classifier has no coefficient rows".to_string(),
            ));
        }
        if self.coef.len() != self.intercept.len() {
            return Err(SentimentError::ShapeMismatch(format!(
                "{} coefficient rows but {} intercepts",
                self.coef.len(),
                self.intercept.len()
            )));
        }
        let width = self.n_features();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err(SentimentError::ShapeMismatch(
                "coefficient rows differ in length".to_string(),
            ));
        }
        Ok(())
    }

    fn decision(&self, class: usize, row: &SparseVector) -> f32 {
        let weights = &self.coef[class];
        row.iter()
            .filter_map(|(idx, v)| weights.get(*idx).map(|w| w * v))
            .sum::<f32>()
            + self.intercept[class]
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, rows: &[SparseVector]) -> Vec<usize> {
        rows.iter()
            .map(|row| {
                if self.coef.len() == 1 {
                    return usize::from(self.decision(0, row) > 0.0);
                }
                let mut best = 0;
                let mut best_score = f32::NEG_INFINITY;
                for class in 0..self.coef.len() {
                    let score = self.decision(class, row);
                    if score > best_score {
                        best = class;
                        best_score = score;
                    }
                }
                best
            })
            .collect()
    }
}

/// Ordered class names; index `i` decodes to `classes[i]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    #[must_use]
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl LabelDecoder for LabelEncoder {
    fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<String>, SentimentError> {
        indices
            .iter()
            .map(|&i| {
                self.classes
                    .get(i)
                    .cloned()
                    .ok_or(SentimentError::UnknownClass(i))
            })
            .collect()
    }
}

/// Vectorizer → classifier → label decoder.
pub struct ClassifierPipeline {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    decoder: Box<dyn LabelDecoder>,
}

impl std::fmt::Debug for ClassifierPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierPipeline").finish_non_exhaustive()
    }
}

impl ClassifierPipeline {
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
        decoder: Box<dyn LabelDecoder>,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            decoder,
        }
    }

    /// Load the three JSON artifacts from `model_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::MissingAsset`] if a file cannot be read,
    /// [`SentimentError::InvalidArtifact`] if one fails to parse, and
    /// [`SentimentError::ShapeMismatch`] if they do not fit together.
    pub fn load(model_dir: &Path) -> Result<Self, SentimentError> {
        let vectorizer: TfidfVectorizer = read_json(&model_dir.join(VECTORIZER_FILE))?;
        vectorizer.validate()?;
        let classifier: LinearClassifier = read_json(&model_dir.join(CLASSIFIER_FILE))?;
        classifier.validate()?;
        let encoder: LabelEncoder = read_json(&model_dir.join(LABEL_ENCODER_FILE))?;

        if classifier.n_features() != vectorizer.n_features() {
            return Err(SentimentError::ShapeMismatch(format!(
                "classifier expects {} features, vectorizer produces {}",
                classifier.n_features(),
                vectorizer.n_features()
            )));
        }
        let n_classes = classifier.coef.len().max(2);
        if encoder.classes.len() < n_classes {
            return Err(SentimentError::ShapeMismatch(format!(
                "classifier has {n_classes} classes, label encoder has {}",
                encoder.classes.len()
            )));
        }

        tracing::info!(
            model_dir = %model_dir.display(),
            features = vectorizer.n_features(),
            classes = encoder.classes.len(),
            "classifier artifacts loaded"
        );
        Ok(Self::new(
            Box::new(vectorizer),
            Box::new(classifier),
            Box::new(encoder),
        ))
    }

    /// Predict one label per document.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::UnknownClass`] if the classifier emits an
    /// index the decoder cannot map.
    pub fn predict_labels(&self, docs: &[String]) -> Result<Vec<String>, SentimentError> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }
        let features = self.vectorizer.transform(docs);
        let indices = self.classifier.predict(&features);
        self.decoder.inverse_transform(&indices)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SentimentError> {
    let content = std::fs::read_to_string(path).map_err(|e| SentimentError::MissingAsset {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| SentimentError::InvalidArtifact {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
