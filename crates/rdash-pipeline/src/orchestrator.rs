//! Run-phase state machine driving collection through scoring.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use rdash_core::{AnalysisRow, AppConfig, QueryConfig, OUTLIER_TOPIC};
use rdash_reddit::{
    CachedCollector, Collection, PostSearch, RedditClient, RedditClientConfig, RedditError,
};
use rdash_text::Normalizer;
use rdash_topics::{
    coherence_cv, qualifying_topics, top_words, ClusterParams, ClusterTopicModel, TopicModel,
    MIN_DOCUMENTS,
};

use crate::assets::NlpAssets;
use crate::notice::{NoticeLevel, NoticeLog};
use crate::phase::RunPhase;
use crate::run::RunResult;
use crate::PipelineError;

/// Keywords per topic fed to the coherence evaluator.
const COHERENCE_TOP_WORDS: usize = 10;

/// Where a run gets its posts.
pub trait PostSource: Send + Sync {
    fn collect(&self) -> impl Future<Output = Collection> + Send;
}

impl<S: PostSearch> PostSource for CachedCollector<S> {
    async fn collect(&self) -> Collection {
        CachedCollector::collect(self).await
    }
}

/// Builds a fresh, unfitted topic model for each run.
pub type TopicModelFactory = Box<dyn Fn() -> Box<dyn TopicModel> + Send + Sync>;

/// The single user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    RunRequested,
}

/// Outcome of the topic-modeling stage.
struct TopicStage {
    model: Option<Box<dyn TopicModel>>,
    coherence: f64,
    corpus: Vec<Vec<String>>,
}

/// Owns the NLP assets and runs the stages in order.
///
/// Holding `&mut self` for the whole run means one run at a time per
/// orchestrator; callers sharing one across tasks put it behind a mutex.
pub struct Orchestrator<P> {
    source: P,
    normalizer: Normalizer,
    assets: NlpAssets,
    new_topic_model: TopicModelFactory,
    default_label: String,
    phase: RunPhase,
    runs: u64,
}

impl<P: PostSource> Orchestrator<P> {
    /// Orchestrator with the default normalizer, clustering model, and
    /// `neutral` fallback label.
    pub fn new(source: P, assets: NlpAssets) -> Self {
        Self {
            source,
            normalizer: Normalizer::default(),
            assets,
            new_topic_model: Box::new(|| Box::new(ClusterTopicModel::default())),
            default_label: "neutral".to_string(),
            phase: RunPhase::Idle,
            runs: 0,
        }
    }

    /// Load assets from the configured paths and size the topic model from
    /// config.
    pub fn from_config(config: &AppConfig, source: P) -> Self {
        let assets = NlpAssets::load(&config.lexicon_path, &config.model_dir);
        let params = ClusterParams {
            similarity_threshold: config.topic_similarity_threshold,
            min_topic_size: config.min_topic_size,
            ..ClusterParams::default()
        };
        Self::new(source, assets)
            .with_topic_model(Box::new(move || Box::new(ClusterTopicModel::new(params))))
            .with_default_label(config.default_classifier_label.clone())
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn with_topic_model(mut self, factory: TopicModelFactory) -> Self {
        self.new_topic_model = factory;
        self
    }

    #[must_use]
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn assets(&self) -> &NlpAssets {
        &self.assets
    }

    /// Handle a user event, running the pipeline to a terminal phase.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidTransition`] if the stage order is
    /// violated. Stage failures are soft and land in the result's notices.
    pub async fn handle(&mut self, event: PipelineEvent) -> Result<RunResult, PipelineError> {
        match event {
            PipelineEvent::RunRequested => self.run().await,
        }
    }

    fn transition(&mut self, next: RunPhase) -> Result<(), PipelineError> {
        if !self.phase.can_transition_to(next) {
            return Err(PipelineError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::info!(from = %self.phase, to = %next, "pipeline phase transition");
        self.phase = next;
        Ok(())
    }

    async fn run(&mut self) -> Result<RunResult, PipelineError> {
        if !(self.phase == RunPhase::Idle || self.phase.is_terminal()) {
            tracing::warn!(phase = %self.phase, "previous run did not finish, starting over");
            self.phase = RunPhase::Idle;
        }

        self.runs += 1;
        let version = self.runs;
        let started_at = Utc::now();
        let mut notices = NoticeLog::default();
        notices.extend(self.assets.notices());

        self.transition(RunPhase::Collecting)?;
        notices.push(NoticeLevel::Info, RunPhase::Collecting, "Scraping Reddit...");
        let collection = self.source.collect().await;
        if !collection.failures.is_empty() {
            notices.push(
                NoticeLevel::Warning,
                RunPhase::Collecting,
                format!(
                    "{} search queries failed; their results are missing",
                    collection.failures.len()
                ),
            );
        }
        if collection.posts.is_empty() {
            notices.push(
                NoticeLevel::Warning,
                RunPhase::Collecting,
                "No data collected from Reddit. Analysis cannot proceed.",
            );
            self.transition(RunPhase::Halted)?;
            return Ok(RunResult {
                version,
                phase: RunPhase::Halted,
                completed: false,
                table: Vec::new(),
                topic_model: None,
                coherence: 0.0,
                coherence_corpus: Vec::new(),
                notices: notices.into_vec(),
                started_at,
                finished_at: Utc::now(),
            });
        }
        notices.push(
            NoticeLevel::Success,
            RunPhase::Collecting,
            format!("Collected {} Reddit entries", collection.posts.len()),
        );

        self.transition(RunPhase::Preprocessing)?;
        notices.push(NoticeLevel::Info, RunPhase::Preprocessing, "Preprocessing text...");
        let mut table: Vec<AnalysisRow> = collection
            .posts
            .iter()
            .map(|post| AnalysisRow::new(post, self.normalizer.normalize(&post.text)))
            .collect();
        notices.push(
            NoticeLevel::Success,
            RunPhase::Preprocessing,
            "Text preprocessing complete!",
        );

        self.transition(RunPhase::TopicModeling)?;
        let topics = self.model_topics(&mut table, &mut notices);

        self.transition(RunPhase::Scoring)?;
        self.score(&mut table, &mut notices);

        self.transition(RunPhase::Complete)?;
        notices.push(NoticeLevel::Success, RunPhase::Complete, "Analysis complete!");

        Ok(RunResult {
            version,
            phase: RunPhase::Complete,
            completed: true,
            table,
            topic_model: topics.model,
            coherence: topics.coherence,
            coherence_corpus: topics.corpus,
            notices: notices.into_vec(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn model_topics(&self, table: &mut [AnalysisRow], notices: &mut NoticeLog) -> TopicStage {
        const PHASE: RunPhase = RunPhase::TopicModeling;
        notices.push(NoticeLevel::Info, PHASE, "Topic modeling...");
        let corpus: Vec<Vec<String>> = table.iter().map(|row| row.tokens.clone()).collect();

        if table.len() < MIN_DOCUMENTS {
            notices.push(NoticeLevel::Warning, PHASE, "Not enough data to perform topic modeling.");
            return TopicStage {
                model: None,
                coherence: 0.0,
                corpus,
            };
        }

        let docs: Vec<String> = table.iter().map(|row| row.text_clean.clone()).collect();
        let mut model = (self.new_topic_model)();
        let labels = match model.fit_transform(&docs) {
            Ok(labels) if labels.len() == table.len() => labels,
            Ok(labels) => {
                notices.push(
                    NoticeLevel::Warning,
                    PHASE,
                    format!(
                        "Topic model returned {} labels for {} documents; topics skipped.",
                        labels.len(),
                        table.len()
                    ),
                );
                return TopicStage {
                    model: None,
                    coherence: 0.0,
                    corpus,
                };
            }
            Err(e) => {
                notices.push(NoticeLevel::Warning, PHASE, format!("Topic modeling failed: {e}"));
                return TopicStage {
                    model: None,
                    coherence: 0.0,
                    corpus,
                };
            }
        };
        for (row, topic) in table.iter_mut().zip(labels) {
            row.topic = topic;
        }

        let topic_words: Vec<Vec<String>> = qualifying_topics(model.as_ref())
            .into_iter()
            .map(|id| top_words(model.as_ref(), id, COHERENCE_TOP_WORDS))
            .collect();
        let has_text = corpus.iter().any(|tokens| !tokens.is_empty());

        if topic_words.is_empty() || !has_text {
            notices.push(
                NoticeLevel::Warning,
                PHASE,
                "Could not calculate coherence score (not enough topics or texts).",
            );
            notices.push(
                NoticeLevel::Info,
                PHASE,
                "No meaningful topics could be extracted or only one topic was found. \
                 This can happen with very small datasets or if text is highly homogenous.",
            );
            for row in table.iter_mut() {
                row.topic = OUTLIER_TOPIC;
            }
            return TopicStage {
                model: Some(model),
                coherence: 0.0,
                corpus,
            };
        }

        let coherence = coherence_cv(&topic_words, &corpus);
        notices.push(
            NoticeLevel::Success,
            PHASE,
            format!("Topic modeling complete (Coherence Score: {coherence:.4})"),
        );
        TopicStage {
            model: Some(model),
            coherence,
            corpus,
        }
    }

    fn score(&self, table: &mut [AnalysisRow], notices: &mut NoticeLog) {
        const PHASE: RunPhase = RunPhase::Scoring;
        notices.push(NoticeLevel::Info, PHASE, "Sentiment analysis...");

        let lexicon = self.assets.lexicon.value();
        for row in table.iter_mut() {
            row.set_lexicon_score(lexicon.score(&row.tokens));
        }

        let labels = match self.assets.classifier.value() {
            Some(pipeline) => {
                let docs: Vec<String> = table.iter().map(|row| row.text_clean.clone()).collect();
                match pipeline.predict_labels(&docs) {
                    Ok(labels) if labels.len() == table.len() => Some(labels),
                    Ok(_) => {
                        notices.push(
                            NoticeLevel::Warning,
                            PHASE,
                            "Classifier returned the wrong number of labels; default label used.",
                        );
                        None
                    }
                    Err(e) => {
                        notices.push(
                            NoticeLevel::Warning,
                            PHASE,
                            format!("Classifier sentiment analysis failed: {e}"),
                        );
                        None
                    }
                }
            }
            None => {
                notices.push(
                    NoticeLevel::Warning,
                    PHASE,
                    "Classifier sentiment analysis skipped due to missing model files.",
                );
                None
            }
        };

        match labels {
            Some(labels) => {
                for (row, label) in table.iter_mut().zip(labels) {
                    row.classifier_label = label;
                }
            }
            None => {
                for row in table.iter_mut() {
                    row.classifier_label.clone_from(&self.default_label);
                }
            }
        }
    }
}

/// Production post source: a Reddit client behind the collection cache.
///
/// # Errors
///
/// Returns [`RedditError`] if the HTTP client cannot be built.
pub fn reddit_source(
    config: &AppConfig,
    queries: QueryConfig,
) -> Result<CachedCollector<RedditClient>, RedditError> {
    let client = RedditClient::new(RedditClientConfig::from(config))?;
    Ok(CachedCollector::new(
        client,
        queries,
        config.search_limit,
        Duration::from_secs(config.collection_cache_ttl_secs),
    ))
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
