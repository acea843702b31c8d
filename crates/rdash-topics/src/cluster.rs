//! TF-IDF clustering topic model with class-based TF-IDF keywords.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use rdash_core::{TopicId, TopicWord, OUTLIER_TOPIC};

use crate::model::{TopicModel, MIN_DOCUMENTS};
use crate::TopicError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Minimum cosine similarity to a cluster seed for a document to join it.
    pub similarity_threshold: f32,
    /// Clusters with fewer members become outliers.
    pub min_topic_size: usize,
    /// Keywords kept per topic.
    pub top_n_words: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.3,
            min_topic_size: 2,
            top_n_words: 10,
        }
    }
}

/// Unit-length sparse TF-IDF vector, sorted by term index.
type DocVector = Vec<(usize, f64)>;

#[derive(Debug, Clone, Default)]
pub struct ClusterTopicModel {
    params: ClusterParams,
    topics: BTreeMap<TopicId, Vec<TopicWord>>,
}

impl ClusterTopicModel {
    #[must_use]
    pub fn new(params: ClusterParams) -> Self {
        Self {
            params,
            topics: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &ClusterParams {
        &self.params
    }
}

impl TopicModel for ClusterTopicModel {
    fn fit_transform(&mut self, docs: &[String]) -> Result<Vec<TopicId>, TopicError> {
        if docs.len() < MIN_DOCUMENTS {
            return Err(TopicError::InsufficientDocuments {
                found: docs.len(),
                required: MIN_DOCUMENTS,
            });
        }

        let tokenized: Vec<Vec<&str>> = docs
            .iter()
            .map(|d| d.split_whitespace().collect())
            .collect();
        let vectors = tfidf_vectors(&tokenized);
        let clusters = seeded_clusters(&vectors, self.params.similarity_threshold);

        let mut kept: Vec<Vec<usize>> = clusters
            .into_iter()
            .filter(|members| members.len() >= self.params.min_topic_size.max(1))
            .collect();
        kept.sort_by_key(|members| (Reverse(members.len()), members[0]));

        let mut labels = vec![OUTLIER_TOPIC; docs.len()];
        for (topic, members) in kept.iter().enumerate() {
            let topic = TopicId::try_from(topic)
                .map_err(|_| TopicError::Model("too many topics".to_string()))?;
            for &doc in members {
                labels[doc] = topic;
            }
        }

        self.topics = class_tfidf(&tokenized, &labels, self.params.top_n_words);

        let outliers = labels.iter().filter(|t| **t == OUTLIER_TOPIC).count();
        tracing::info!(
            documents = docs.len(),
            topics = kept.len(),
            outliers,
            "topic model fitted"
        );
        Ok(labels)
    }

    fn topics(&self) -> Vec<TopicId> {
        self.topics.keys().copied().collect()
    }

    fn topic(&self, id: TopicId) -> Option<&[TopicWord]> {
        self.topics.get(&id).map(Vec::as_slice)
    }
}

/// Smooth-IDF TF-IDF vectors, L2-normalised. Empty documents get an empty vector.
#[allow(clippy::cast_precision_loss)]
fn tfidf_vectors(docs: &[Vec<&str>]) -> Vec<DocVector> {
    let mut vocabulary: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in docs {
        for term in doc {
            let next = vocabulary.len();
            vocabulary.entry(*term).or_insert(next);
        }
    }

    let mut df = vec![0usize; vocabulary.len()];
    let counts: Vec<HashMap<usize, usize>> = docs
        .iter()
        .map(|doc| {
            let mut tf: HashMap<usize, usize> = HashMap::new();
            for term in doc {
                *tf.entry(vocabulary[term]).or_insert(0) += 1;
            }
            for idx in tf.keys() {
                df[*idx] += 1;
            }
            tf
        })
        .collect();

    let n = docs.len() as f64;
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    counts
        .into_iter()
        .map(|tf| {
            let mut v: DocVector = tf
                .into_iter()
                .map(|(idx, c)| (idx, c as f64 * idf[idx]))
                .collect();
            v.sort_by_key(|(idx, _)| *idx);
            let norm = v.iter().map(|(_, x)| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, x) in &mut v {
                    *x /= norm;
                }
            }
            v
        })
        .collect()
}

fn cosine(a: &DocVector, b: &DocVector) -> f64 {
    let (mut i, mut j, mut dot) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

/// Single pass: each unassigned non-empty document seeds a cluster and
/// absorbs every later unassigned document at or above `threshold`.
fn seeded_clusters(vectors: &[DocVector], threshold: f32) -> Vec<Vec<usize>> {
    let threshold = f64::from(threshold);
    let mut assigned = vec![false; vectors.len()];
    let mut clusters = Vec::new();

    for i in 0..vectors.len() {
        if assigned[i] || vectors[i].is_empty() {
            continue;
        }
        assigned[i] = true;
        let mut members = vec![i];
        for j in (i + 1)..vectors.len() {
            if !assigned[j]
                && !vectors[j].is_empty()
                && cosine(&vectors[i], &vectors[j]) >= threshold
            {
                assigned[j] = true;
                members.push(j);
            }
        }
        clusters.push(members);
    }
    clusters
}

/// Class-based TF-IDF keywords for every class present in `labels`,
/// including the outlier class.
#[allow(clippy::cast_precision_loss)]
fn class_tfidf(
    docs: &[Vec<&str>],
    labels: &[TopicId],
    top_n: usize,
) -> BTreeMap<TopicId, Vec<TopicWord>> {
    let mut class_counts: BTreeMap<TopicId, HashMap<&str, usize>> = BTreeMap::new();
    for (doc, &label) in docs.iter().zip(labels) {
        let counts = class_counts.entry(label).or_default();
        for term in doc {
            *counts.entry(*term).or_insert(0) += 1;
        }
    }

    let mut term_totals: HashMap<&str, usize> = HashMap::new();
    for counts in class_counts.values() {
        for (term, c) in counts {
            *term_totals.entry(*term).or_insert(0) += c;
        }
    }
    let non_empty = class_counts.values().filter(|c| !c.is_empty()).count();
    let total_words: usize = term_totals.values().sum();
    let avg_words = if non_empty == 0 {
        0.0
    } else {
        total_words as f64 / non_empty as f64
    };

    class_counts
        .into_iter()
        .map(|(label, counts)| {
            let class_total: usize = counts.values().sum();
            let mut words: Vec<TopicWord> = counts
                .into_iter()
                .map(|(term, c)| {
                    let tf = c as f64 / class_total as f64;
                    let idf = (1.0 + avg_words / term_totals[term] as f64).ln();
                    (term.to_string(), tf * idf)
                })
                .collect();
            words.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            words.truncate(top_n);
            (label, words)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(ToString::to_string).collect()
    }

    fn corpus() -> Vec<String> {
        docs(&[
            "train coach women crowd",
            "women coach train safe",
            "coach women train",
            "food nasi lemak",
            "nasi lemak sedap food",
            "",
        ])
    }

    #[test]
    fn fewer_than_two_documents_is_rejected() {
        let mut model = ClusterTopicModel::default();
        let err = model.fit_transform(&docs(&["lonely"])).unwrap_err();
        assert!(matches!(
            err,
            TopicError::InsufficientDocuments { found: 1, required: 2 }
        ));
    }

    #[test]
    fn similar_documents_share_a_topic() {
        let mut model = ClusterTopicModel::default();
        let labels = model.fit_transform(&corpus()).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 1, 1, -1]);
        assert_eq!(model.topics(), vec![-1, 0, 1]);
    }

    #[test]
    fn keywords_rank_by_weight_then_alphabetically() {
        let mut model = ClusterTopicModel::default();
        model.fit_transform(&corpus()).unwrap();
        let words: Vec<&str> = model
            .topic(0)
            .unwrap()
            .iter()
            .map(|(w, _)| w.as_str())
            .collect();
        assert_eq!(&words[..3], &["coach", "train", "women"]);
        assert!(words.contains(&"crowd"));
        let weights: Vec<f64> = model.topic(0).unwrap().iter().map(|(_, w)| *w).collect();
        assert!(weights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn strict_threshold_makes_everything_an_outlier() {
        let mut model = ClusterTopicModel::new(ClusterParams {
            similarity_threshold: 0.99,
            ..ClusterParams::default()
        });
        let labels = model
            .fit_transform(&docs(&["coach train", "nasi lemak", "women safe"]))
            .unwrap();
        assert!(labels.iter().all(|t| *t == OUTLIER_TOPIC));
        assert_eq!(model.topics(), vec![-1]);
        assert!(model.topic(0).is_none());
    }

    #[test]
    fn min_topic_size_one_keeps_singletons() {
        let mut model = ClusterTopicModel::new(ClusterParams {
            min_topic_size: 1,
            ..ClusterParams::default()
        });
        let labels = model.fit_transform(&docs(&["coach train", "nasi lemak"])).unwrap();
        assert_eq!(labels, vec![0, 1]);
    }

    #[test]
    fn top_n_words_truncates() {
        let mut model = ClusterTopicModel::new(ClusterParams {
            top_n_words: 2,
            ..ClusterParams::default()
        });
        model.fit_transform(&corpus()).unwrap();
        assert_eq!(model.topic(0).unwrap().len(), 2);
    }

    #[test]
    fn refit_replaces_previous_topics() {
        let mut model = ClusterTopicModel::default();
        model.fit_transform(&corpus()).unwrap();
        model
            .fit_transform(&docs(&["coach train", "coach train"]))
            .unwrap();
        assert_eq!(model.topics(), vec![0]);
    }
}
