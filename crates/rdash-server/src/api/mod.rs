mod export;
mod runs;
mod sentiment;
mod topics;

use std::sync::{Arc, PoisonError, RwLock};

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use rdash_pipeline::{Orchestrator, PostSource, RunResult};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

/// Shared server state.
///
/// The orchestrator mutex serialises runs; the published result is swapped
/// under a short write lock only once a run is finished.
pub struct AppState<P> {
    orchestrator: Arc<Mutex<Orchestrator<P>>>,
    latest: Arc<RwLock<Option<Arc<RunResult>>>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<P: PostSource> AppState<P> {
    pub fn new(orchestrator: Orchestrator<P>) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// The most recently published run, if any.
    pub(super) fn latest(&self) -> Option<Arc<RunResult>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn publish(&self, run: Arc<RunResult>) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(run);
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    latest_run_version: Option<u64>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// The latest run if it completed, else a 404 explaining why.
pub(super) fn completed_run<P: PostSource>(
    state: &AppState<P>,
    request_id: &str,
) -> Result<Arc<RunResult>, ApiError> {
    match state.latest() {
        Some(run) if run.completed => Ok(run),
        Some(_) => Err(ApiError::new(
            request_id,
            "not_found",
            "the latest run halted before analysis; trigger a new run",
        )),
        None => Err(ApiError::new(
            request_id,
            "not_found",
            "no analysis run has been triggered yet",
        )),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app<P: PostSource + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::<P>))
        .route("/api/v1/runs", post(runs::trigger_run::<P>))
        .route("/api/v1/runs/latest", get(runs::latest_run::<P>))
        .route("/api/v1/topics", get(topics::list_topics::<P>))
        .route(
            "/api/v1/topics/{topic_id}/wordcloud",
            get(topics::topic_word_cloud::<P>),
        )
        .route("/api/v1/sentiment", get(sentiment::sentiment_distribution::<P>))
        .route("/api/v1/export", get(export::export_csv::<P>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<P: PostSource>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            latest_run_version: state.latest().map(|run| run.version),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
