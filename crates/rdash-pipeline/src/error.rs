use thiserror::Error;

use crate::phase::RunPhase;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("a pipeline run is already in progress")]
    RunInProgress,

    #[error("illegal phase transition {from} -> {to}")]
    InvalidTransition { from: RunPhase, to: RunPhase },

    #[error("no completed run is available")]
    NoCompletedRun,

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
