use crate::handlers::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// Records method, path, status and latency for every request.
///
/// 5xx responses are tracked as `api_error`, everything else as
/// `api_request`. The response passes through unchanged.
pub async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let duration = started.elapsed();
    let status = response.status();

    let mut data = Map::new();
    data.insert("method".to_string(), Value::from(method.as_str()));
    data.insert("path".to_string(), Value::from(path.as_str()));
    data.insert("status".to_string(), Value::from(status.as_u16()));
    data.insert(
        "duration_ms".to_string(),
        Value::from(duration.as_millis() as u64),
    );

    if status.is_server_error() {
        state
            .analytics
            .track_event("api_error", Some(&data), &path, None, None);
        tracing::error!(
            "{} {} - Status: {} - Duration: {:.2}ms",
            method,
            path,
            status.as_u16(),
            duration.as_secs_f64() * 1000.0
        );
    } else {
        state
            .analytics
            .track_event("api_request", Some(&data), &path, None, None);
        tracing::info!(
            "{} {} - Status: {} - Duration: {:.2}ms",
            method,
            path,
            status.as_u16(),
            duration.as_secs_f64() * 1000.0
        );
    }

    response
}
