use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// Request ID carried in request extensions and echoed as `x-request-id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tag every request with an ID and log its outcome.
///
/// A caller-supplied `x-request-id` is reused, otherwise a `UUIDv4` is
/// generated.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;

    tracing::debug!(
        request_id = %id,
        %method,
        path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis(),
        "request handled"
    );
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }
    res
}
