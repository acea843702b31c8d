use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{HeaderMap, Request};
use chrono::DateTime;
use rdash_core::{PostRecord, TopicId, TopicWord};
use rdash_pipeline::NlpAssets;
use rdash_reddit::Collection;
use rdash_sentiment::Lexicon;
use rdash_topics::{TopicError, TopicModel};
use tokio::sync::Notify;
use tower::ServiceExt;

use super::*;

struct FixedSource(Collection);

impl PostSource for FixedSource {
    async fn collect(&self) -> Collection {
        self.0.clone()
    }
}

/// Blocks inside collection until released.
struct GatedSource {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl PostSource for GatedSource {
    async fn collect(&self) -> Collection {
        self.entered.notify_one();
        self.release.notified().await;
        Collection::default()
    }
}

struct TwoTopics;

impl TopicModel for TwoTopics {
    fn fit_transform(&mut self, docs: &[String]) -> Result<Vec<TopicId>, TopicError> {
        Ok((0..docs.len()).map(|i| if i < 2 { 0 } else { 1 }).collect())
    }

    fn topics(&self) -> Vec<TopicId> {
        vec![0, 1]
    }

    fn topic(&self, id: TopicId) -> Option<&[TopicWord]> {
        static TOPICS: std::sync::LazyLock<BTreeMap<TopicId, Vec<TopicWord>>> =
            std::sync::LazyLock::new(|| {
                BTreeMap::from([
                    (
                        0,
                        vec![("coach".to_string(), 0.5), ("crowd".to_string(), 0.3)],
                    ),
                    (1, vec![("ticket".to_string(), 0.4)]),
                ])
            });
        TOPICS.get(&id).map(Vec::as_slice)
    }
}

fn post(id: &str, text: &str) -> PostRecord {
    PostRecord {
        id: id.to_string(),
        source: "malaysia".to_string(),
        text: text.to_string(),
        created_utc: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    }
}

fn orchestrator<P: PostSource>(source: P) -> Orchestrator<P> {
    Orchestrator::new(source, NlpAssets::ready(Lexicon::parse("coach 1\n"), None))
        .with_topic_model(Box::new(|| Box::new(TwoTopics)))
}

fn app_with_posts(posts: Vec<PostRecord>) -> Router {
    let source = FixedSource(Collection {
        posts,
        failures: Vec::new(),
    });
    build_app(AppState::new(orchestrator(source)))
}

fn three_posts() -> Vec<PostRecord> {
    vec![
        post("a", "Women coach crowded"),
        post("b", "Women coach crowded again"),
        post("c", "Ticket price went up"),
    ]
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, headers, body)
}

fn json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).expect("json parse")
}

#[tokio::test]
async fn health_reports_no_run_yet() {
    let app = app_with_posts(three_posts());
    let (status, headers, body) = send(&app, "GET", "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.contains_key("x-request-id"));
    let json = json(&body);
    assert_eq!(json["data"]["status"], "ok");
    assert!(json["data"]["latest_run_version"].is_null());
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = app_with_posts(three_posts());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn views_are_not_found_before_any_run() {
    let app = app_with_posts(three_posts());
    for uri in [
        "/api/v1/runs/latest",
        "/api/v1/topics",
        "/api/v1/sentiment",
        "/api/v1/export",
        "/api/v1/topics/0/wordcloud",
    ] {
        let (status, _, body) = send(&app, "GET", uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json(&body)["error"]["code"], "not_found", "{uri}");
    }
}

#[tokio::test]
async fn run_then_read_every_view() {
    let app = app_with_posts(three_posts());

    let (status, _, body) = send(&app, "POST", "/api/v1/runs").await;
    assert_eq!(status, StatusCode::OK);
    let run = json(&body);
    assert_eq!(run["data"]["completed"], true);
    assert_eq!(run["data"]["phase"], "complete");
    assert_eq!(run["data"]["version"], 1);
    assert_eq!(run["data"]["rows"], 3);

    let (status, _, body) = send(&app, "GET", "/api/v1/runs/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["data"]["version"], 1);

    let (_, _, body) = send(&app, "GET", "/api/v1/health").await;
    assert_eq!(json(&body)["data"]["latest_run_version"], 1);

    let (status, _, body) = send(&app, "GET", "/api/v1/topics").await;
    assert_eq!(status, StatusCode::OK);
    let topics = json(&body);
    assert_eq!(topics["data"]["summaries"].as_array().map(Vec::len), Some(2));
    assert_eq!(topics["data"]["summaries"][0]["top_keywords"], "coach, crowd");
    assert_eq!(
        topics["data"]["summaries"][1]["samples"][0],
        "Ticket price went up"
    );
    assert_eq!(topics["data"]["selector"], serde_json::json!([0, 1]));

    let (status, _, body) = send(&app, "GET", "/api/v1/sentiment").await;
    assert_eq!(status, StatusCode::OK);
    let sentiment = json(&body);
    assert_eq!(sentiment["data"]["overall"]["neutral"], 3);
    assert_eq!(sentiment["data"]["by_topic"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn export_is_a_csv_attachment() {
    let app = app_with_posts(three_posts());
    send(&app, "POST", "/api/v1/runs").await;

    let (status, headers, body) = send(&app, "GET", "/api/v1/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"reddit_analysis_output.csv\""
    );
    let text = String::from_utf8(body.to_vec()).expect("utf-8");
    assert!(text.starts_with("source,text,created_utc,text_clean,tokens,topic,"));
    assert_eq!(text.lines().count(), 4);
}

#[tokio::test]
async fn word_cloud_is_svg_or_explained() {
    let app = app_with_posts(three_posts());
    send(&app, "POST", "/api/v1/runs").await;

    let (status, headers, body) = send(&app, "GET", "/api/v1/topics/0/wordcloud").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml");
    let svg = String::from_utf8(body.to_vec()).expect("utf-8");
    assert!(svg.contains("Word Cloud for Topic ID: 0"));

    let (status, _, body) = send(&app, "GET", "/api/v1/topics/-1/wordcloud").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = json(&body)["error"]["message"].as_str().map(str::to_string);
    assert!(message.is_some_and(|m| m.contains("outlier")));

    let (status, _, _) = send(&app, "GET", "/api/v1/topics/99/wordcloud").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_collection_halts_and_hides_views() {
    let app = app_with_posts(Vec::new());

    let (status, _, body) = send(&app, "POST", "/api/v1/runs").await;
    assert_eq!(status, StatusCode::OK);
    let run = json(&body);
    assert_eq!(run["data"]["completed"], false);
    assert_eq!(run["data"]["phase"], "halted");
    assert_eq!(run["data"]["rows"], 0);

    let (status, _, body) = send(&app, "GET", "/api/v1/topics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = json(&body)["error"]["message"].as_str().map(str::to_string);
    assert!(message.is_some_and(|m| m.contains("halted")));
}

#[tokio::test]
async fn second_trigger_while_running_conflicts() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let source = GatedSource {
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    };
    let app = build_app(AppState::new(orchestrator(source)));

    let first = tokio::spawn({
        let app = app.clone();
        async move { send(&app, "POST", "/api/v1/runs").await }
    });
    entered.notified().await;

    let (status, _, body) = send(&app, "POST", "/api/v1/runs").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json(&body)["error"]["code"], "conflict");

    release.notify_one();
    let (status, _, _) = first.await.expect("first run task");
    assert_eq!(status, StatusCode::OK);
}

#[test]
fn unknown_error_code_maps_to_internal() {
    let response = ApiError::new("req-1", "internal_error", "boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let response = ApiError::new("req-1", "conflict", "busy").into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
