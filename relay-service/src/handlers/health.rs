use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::services::get_metrics;

/// Health check endpoint for liveness probes.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "relay-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe. The relay holds no connections of its own, so ready
/// equals alive.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
