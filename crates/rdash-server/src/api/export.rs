use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use rdash_pipeline::{PostSource, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};

use crate::middleware::RequestId;

use super::{completed_run, ApiError, AppState};

/// The latest table as a CSV attachment.
pub(super) async fn export_csv<P: PostSource>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let run = completed_run(&state, &req_id.0)?;
    let body = run.export_csv().map_err(|e| {
        tracing::error!(error = %e, "CSV export failed");
        ApiError::new(req_id.0.clone(), "internal_error", "CSV export failed")
    })?;

    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
