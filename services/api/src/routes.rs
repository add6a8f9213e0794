use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use move_estimate::estimate::submission::{estimate_router, EstimateService, SubmissionInbox};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct MoveSizeView {
    pub(crate) key: String,
    pub(crate) label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
}

pub(crate) fn with_estimate_routes<I>(service: Arc<EstimateService<I>>) -> axum::Router
where
    I: SubmissionInbox + 'static,
{
    estimate_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/move-sizes", axum::routing::get(move_sizes_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Size options offered by the active rate card.
pub(crate) async fn move_sizes_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<MoveSizeView>> {
    let sizes = state
        .catalog
        .iter()
        .map(|(key, entry)| MoveSizeView {
            key: key.to_string(),
            label: entry.label.clone(),
            description: entry.description.clone(),
        })
        .collect();
    Json(sizes)
}
