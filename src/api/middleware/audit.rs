//! Access logging middleware.
//!
//! Logs every request with method, path, response status and latency
//! once the handler has produced a response.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    if response.status().is_server_error() {
        tracing::error!(%method, path, status, latency_ms, "request failed");
    } else {
        tracing::info!(%method, path, status, latency_ms, "request served");
    }

    response
}
