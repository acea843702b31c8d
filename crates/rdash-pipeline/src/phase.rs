use serde::Serialize;

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Collecting,
    Preprocessing,
    TopicModeling,
    Scoring,
    Complete,
    /// Collection produced nothing; later stages never ran.
    Halted,
}

impl RunPhase {
    /// Whether moving from `self` to `next` is a legal edge.
    ///
    /// A new run may start from `Idle` or from either terminal phase.
    #[must_use]
    pub fn can_transition_to(self, next: RunPhase) -> bool {
        use RunPhase::{Collecting, Complete, Halted, Idle, Preprocessing, Scoring, TopicModeling};
        matches!(
            (self, next),
            (Idle | Complete | Halted, Collecting)
                | (Collecting, Preprocessing | Halted)
                | (Preprocessing, TopicModeling)
                | (TopicModeling, Scoring)
                | (Scoring, Complete)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Halted)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Preprocessing => "preprocessing",
            Self::TopicModeling => "topic_modeling",
            Self::Scoring => "scoring",
            Self::Complete => "complete",
            Self::Halted => "halted",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
