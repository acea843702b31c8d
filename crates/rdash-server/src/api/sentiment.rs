use axum::{extract::State, Extension, Json};
use rdash_pipeline::{PostSource, SentimentDistribution};

use crate::middleware::RequestId;

use super::{completed_run, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn sentiment_distribution<P: PostSource>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<SentimentDistribution>>, ApiError> {
    let run = completed_run(&state, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: run.sentiment(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
