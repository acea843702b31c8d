use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use rdash_core::TopicId;
use rdash_pipeline::PostSource;
use rdash_topics::{TopicSummary, WordCloud};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{completed_run, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct TopicsData {
    coherence: f64,
    summaries: Vec<TopicSummary>,
    /// Topic ids offered for word clouds.
    selector: Vec<TopicId>,
}

pub(super) async fn list_topics<P: PostSource>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<TopicsData>>, ApiError> {
    let run = completed_run(&state, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: TopicsData {
            coherence: run.coherence,
            summaries: run.topic_summaries(),
            selector: run.selector_topics(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// SVG word cloud for one topic, or 404 with the reason none exists.
pub(super) async fn topic_word_cloud<P: PostSource>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
    Path(topic_id): Path<TopicId>,
) -> Result<Response, ApiError> {
    let run = completed_run(&state, &req_id.0)?;
    match run.word_cloud(topic_id, &WordCloud::default()) {
        Ok(image) => Ok(([(header::CONTENT_TYPE, "image/svg+xml")], image.svg).into_response()),
        Err(skip) => {
            tracing::debug!(topic = topic_id, reason = %skip, "word cloud skipped");
            Err(ApiError::new(req_id.0, "not_found", skip.to_string()))
        }
    }
}
