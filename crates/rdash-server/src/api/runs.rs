use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use rdash_pipeline::{PipelineError, PipelineEvent, PostSource, RunStatus};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Run the pipeline to completion and publish the result.
///
/// The run executes on its own task so a dropped connection cannot leave it
/// half finished. A second trigger while one is running gets 409.
pub(super) async fn trigger_run<P: PostSource + 'static>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RunStatus>>, ApiError> {
    let Ok(mut orchestrator) = Arc::clone(&state.orchestrator).try_lock_owned() else {
        tracing::info!(request_id = %req_id.0, "run rejected, another run is in progress");
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            PipelineError::RunInProgress.to_string(),
        ));
    };

    let publisher = state.clone();
    let task = tokio::spawn(async move {
        let run = orchestrator.handle(PipelineEvent::RunRequested).await?;
        let run = Arc::new(run);
        publisher.publish(Arc::clone(&run));
        Ok::<_, PipelineError>(run)
    });

    let run = match task.await {
        Ok(Ok(run)) => run,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "pipeline run failed");
            return Err(ApiError::new(req_id.0, "internal_error", e.to_string()));
        }
        Err(e) => {
            tracing::error!(error = %e, "pipeline task aborted");
            return Err(ApiError::new(
                req_id.0,
                "internal_error",
                "pipeline task aborted",
            ));
        }
    };

    Ok(Json(ApiResponse {
        data: run.status(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn latest_run<P: PostSource>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RunStatus>>, ApiError> {
    let run = state.latest().ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            "no analysis run has been triggered yet",
        )
    })?;
    Ok(Json(ApiResponse {
        data: run.status(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
