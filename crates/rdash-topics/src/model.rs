use rdash_core::{TopicId, TopicWord, OUTLIER_TOPIC};

use crate::TopicError;

/// Fewer documents than this and topic modeling is not attempted.
pub const MIN_DOCUMENTS: usize = 2;

/// A fitted-in-place topic model.
///
/// `fit_transform` assigns one topic id per document; afterwards the model
/// answers which topics exist and their ranked keywords. Id `-1` is the
/// outlier class.
pub trait TopicModel: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TopicError`] if the model cannot be fitted to `docs`.
    fn fit_transform(&mut self, docs: &[String]) -> Result<Vec<TopicId>, TopicError>;

    /// Every topic id known to the model, ascending. May include `-1`.
    fn topics(&self) -> Vec<TopicId>;

    /// Ranked keywords of one topic, weight descending.
    fn topic(&self, id: TopicId) -> Option<&[TopicWord]>;
}

/// Topic ids excluding the outlier class.
pub fn qualifying_topics(model: &dyn TopicModel) -> Vec<TopicId> {
    model
        .topics()
        .into_iter()
        .filter(|id| *id != OUTLIER_TOPIC)
        .collect()
}

/// The first `n` keywords of a topic, or none if the topic is unknown.
pub fn top_words(model: &dyn TopicModel, id: TopicId, n: usize) -> Vec<String> {
    model
        .topic(id)
        .map(|words| words.iter().take(n).map(|(w, _)| w.clone()).collect())
        .unwrap_or_default()
}
