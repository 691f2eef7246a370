//! Request logging middleware.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Logs one line per request: generated request id, method, matched route,
/// status, and latency.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request_id = uuid::Uuid::new_v4();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis();

    if status >= 500 {
        error!(%request_id, %method, path, status, latency_ms, "request failed");
    } else if status >= 400 {
        warn!(%request_id, %method, path, status, latency_ms, "request rejected");
    } else {
        info!(%request_id, %method, path, status, latency_ms, "request completed");
    }

    response
}
