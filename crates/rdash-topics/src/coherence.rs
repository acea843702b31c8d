//! C_V topic coherence.
//!
//! Boolean sliding-window co-occurrence counts feed normalised PMI context
//! vectors; each keyword's vector is compared by cosine with the sum of the
//! topic's vectors (one-set segmentation). Scores are averaged over the
//! keywords of a topic, then over topics.

use std::collections::{HashMap, HashSet};

/// Sliding window width in tokens.
pub const COHERENCE_WINDOW: usize = 110;

const EPSILON: f64 = 1e-12;

/// Mean C_V coherence over `topics`, computed against `texts`.
///
/// Returns `0.0` when there are no topics or no non-empty texts.
#[must_use]
pub fn coherence_cv(topics: &[Vec<String>], texts: &[Vec<String>]) -> f64 {
    let per_topic = coherence_per_topic(topics, texts);
    if per_topic.is_empty() {
        return 0.0;
    }
    mean(&per_topic)
}

/// C_V coherence of each topic, in input order.
#[must_use]
pub fn coherence_per_topic(topics: &[Vec<String>], texts: &[Vec<String>]) -> Vec<f64> {
    let relevant: HashSet<&str> = topics.iter().flatten().map(String::as_str).collect();
    if relevant.is_empty() {
        return Vec::new();
    }
    let stats = WindowStats::accumulate(texts, &relevant, COHERENCE_WINDOW);
    if stats.windows == 0 {
        return Vec::new();
    }

    topics
        .iter()
        .map(|topic| topic_coherence(topic, &stats))
        .collect()
}

fn topic_coherence(topic: &[String], stats: &WindowStats<'_>) -> f64 {
    if topic.is_empty() {
        return 0.0;
    }
    let context: Vec<Vec<f64>> = topic
        .iter()
        .map(|w_prime| {
            topic
                .iter()
                .map(|w_j| stats.npmi(w_prime, w_j))
                .collect()
        })
        .collect();

    let mut topic_vector = vec![0.0; topic.len()];
    for row in &context {
        for (acc, v) in topic_vector.iter_mut().zip(row) {
            *acc += v;
        }
    }

    let sims: Vec<f64> = context
        .iter()
        .map(|row| cosine(row, &topic_vector))
        .collect();
    mean(&sims)
}

struct WindowStats<'a> {
    windows: usize,
    single: HashMap<&'a str, usize>,
    pair: HashMap<(&'a str, &'a str), usize>,
}

impl<'a> WindowStats<'a> {
    fn accumulate(texts: &[Vec<String>], relevant: &HashSet<&'a str>, size: usize) -> Self {
        let mut stats = Self {
            windows: 0,
            single: HashMap::new(),
            pair: HashMap::new(),
        };
        for text in texts {
            for window in windows(text, size) {
                stats.windows += 1;
                let mut present: Vec<&'a str> = window
                    .iter()
                    .filter_map(|w| relevant.get(w.as_str()).copied())
                    .collect::<HashSet<_>>()
                    .into_iter()
                    .collect();
                present.sort_unstable();
                for (i, a) in present.iter().enumerate() {
                    *stats.single.entry(*a).or_insert(0) += 1;
                    for b in &present[i + 1..] {
                        *stats.pair.entry((*a, *b)).or_insert(0) += 1;
                    }
                }
            }
        }
        stats
    }

    fn co_occurrences(&self, a: &str, b: &str) -> usize {
        if a == b {
            return self.single.get(a).copied().unwrap_or(0);
        }
        let key = if a < b { (a, b) } else { (b, a) };
        self.pair.get(&key).copied().unwrap_or(0)
    }

    /// Normalised PMI; `0.0` if either word never occurs.
    #[allow(clippy::cast_precision_loss)]
    fn npmi(&self, a: &str, b: &str) -> f64 {
        let n = self.windows as f64;
        let count_a = self.single.get(a).copied().unwrap_or(0);
        let count_b = self.single.get(b).copied().unwrap_or(0);
        if count_a == 0 || count_b == 0 {
            return 0.0;
        }
        let p_a = count_a as f64 / n;
        let p_b = count_b as f64 / n;
        let p_ab = self.co_occurrences(a, b) as f64 / n;
        let pmi = ((p_ab + EPSILON) / (p_a * p_b)).ln();
        let denom = -(p_ab + EPSILON).ln();
        if denom == 0.0 {
            return 0.0;
        }
        pmi / denom
    }
}

/// Boolean sliding windows; a text shorter than `size` is one window and
/// an empty text yields none.
fn windows(text: &[String], size: usize) -> Box<dyn Iterator<Item = &[String]> + '_> {
    if text.is_empty() {
        Box::new(std::iter::empty())
    } else if text.len() <= size {
        Box::new(std::iter::once(text))
    } else {
        Box::new(text.windows(size))
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(ToString::to_string).collect()
    }

    fn texts() -> Vec<Vec<String>> {
        vec![words("a b"), words("a b"), words("c d")]
    }

    #[test]
    fn no_topics_scores_zero() {
        assert_eq!(coherence_cv(&[], &texts()), 0.0);
    }

    #[test]
    fn no_texts_scores_zero() {
        assert_eq!(coherence_cv(&[words("a b")], &[]), 0.0);
        assert_eq!(coherence_cv(&[words("a b")], &[vec![]]), 0.0);
    }

    #[test]
    fn always_cooccurring_words_are_fully_coherent() {
        let score = coherence_cv(&[words("a b")], &texts());
        assert!((score - 1.0).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn disjoint_words_score_lower() {
        let coherent = coherence_cv(&[words("a b")], &texts());
        let scattered = coherence_cv(&[words("a c")], &texts());
        assert!(scattered < coherent, "{scattered} >= {coherent}");
    }

    #[test]
    fn score_is_mean_over_topics() {
        let topics = vec![words("a b"), words("a c")];
        let per_topic = coherence_per_topic(&topics, &texts());
        assert_eq!(per_topic.len(), 2);
        let overall = coherence_cv(&topics, &texts());
        assert!((overall - (per_topic[0] + per_topic[1]) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn unseen_keywords_do_not_produce_nan() {
        let score = coherence_cv(&[words("zz yy")], &texts());
        assert!(score.is_finite());
    }

    #[test]
    fn long_texts_slide_the_window() {
        let long: Vec<String> = (0..200).map(|i| format!("w{i}")).collect();
        assert_eq!(windows(&long, COHERENCE_WINDOW).count(), 91);
        assert_eq!(windows(&words("a b"), COHERENCE_WINDOW).count(), 1);
        assert_eq!(windows(&[], COHERENCE_WINDOW).count(), 0);
    }
}
