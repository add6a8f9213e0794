use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{EstimateSubmission, SubmissionId};
use super::repository::{InboxError, SubmissionInbox};
use super::service::{EstimateService, ServiceError};
use crate::estimate::pricing::QuoteRequest;

/// Router exposing quoting, lead intake and lookup.
pub fn estimate_router<I>(service: Arc<EstimateService<I>>) -> Router
where
    I: SubmissionInbox + 'static,
{
    Router::new()
        .route("/api/v1/estimates/quote", post(quote_handler::<I>))
        .route("/api/v1/estimates", post(submit_handler::<I>))
        .route(
            "/api/v1/estimates/:submission_id",
            get(fetch_handler::<I>),
        )
        .with_state(service)
}

pub(crate) async fn quote_handler<I>(
    State(service): State<Arc<EstimateService<I>>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response
where
    I: SubmissionInbox + 'static,
{
    match service.quote(&request) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<I>(
    State(service): State<Arc<EstimateService<I>>>,
    axum::Json(submission): axum::Json<EstimateSubmission>,
) -> Response
where
    I: SubmissionInbox + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.receipt())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<I>(
    State(service): State<Arc<EstimateService<I>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    I: SubmissionInbox + 'static,
{
    let id = SubmissionId(submission_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.receipt())).into_response(),
        Err(ServiceError::Inbox(InboxError::NotFound)) => {
            let payload = json!({
                "error": "submission not found",
                "submission_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    match error {
        ServiceError::Invalid(details) => {
            let payload = json!({
                "error": "Validation failed",
                "details": details,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ServiceError::Unpriceable => {
            let payload = json!({
                "error": ServiceError::Unpriceable.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ServiceError::Inbox(InboxError::Conflict) => {
            let payload = json!({
                "error": "submission already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
