use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::estimate::pricing::PricingPolicyKind;
use crate::estimate::submission::router::{fetch_handler, submit_handler};
use crate::estimate::submission::EstimateService;

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(EstimateService::new(
        Arc::new(ConflictInbox),
        PricingPolicyKind::Detailed.build(),
    ));

    let response =
        submit_handler::<ConflictInbox>(State(service), axum::Json(submission())).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_field_details_on_validation_failure() {
    let (service, _) = build_service();
    let mut invalid = submission();
    invalid.form.phone.clear();
    invalid.form.to_coordinates = None;

    let response =
        submit_handler::<MemoryInbox>(State(Arc::new(service)), axum::Json(invalid)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Validation failed");
    let fields: Vec<&str> = payload["details"]
        .as_array()
        .expect("details array")
        .iter()
        .filter_map(|detail| detail["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["toCoordinates", "phone"]);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_inbox_failure() {
    let service = Arc::new(EstimateService::new(
        Arc::new(UnavailableInbox),
        PricingPolicyKind::Detailed.build(),
    ));

    let response =
        submit_handler::<UnavailableInbox>(State(service), axum::Json(submission())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn submit_route_accepts_browser_payload() {
    let (service, inbox) = build_service();
    let router = estimate_router_with_service(service);

    let body = json!({
        "moveType": "residential",
        "fromAddress": "123 Main St, Washington, DC",
        "fromCoordinates": { "lat": 38.9072, "lng": -77.0365 },
        "toAddress": "456 Oak Ave, Arlington, VA",
        "toCoordinates": { "lat": 38.8799, "lng": -77.1060 },
        "moveSize": "studio",
        "moveDate": "2025-03-11",
        "moveTime": "10:00",
        "hasSpecialItems": false,
        "needsPacking": false,
        "needsStorage": false,
        "fullName": "Jane Smith",
        "email": "jane@example.com",
        "phone": "202-555-0100",
        "estimatedCost": { "min": 363, "max": 443, "distance": 4 }
    });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/estimates")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&body).expect("body serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "received");
    assert_eq!(payload["pricing_policy"], "detailed");
    assert_eq!(
        payload["estimated_cost"],
        json!({ "min": 363, "max": 443, "distance": 4 })
    );
    assert!(payload
        .get("submission_id")
        .and_then(Value::as_str)
        .is_some_and(|id| id.starts_with("est-")));
    assert_eq!(inbox.len(), 1);
}

#[tokio::test]
async fn quote_route_returns_breakdown_and_range() {
    let (service, _) = build_service();
    let router = estimate_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/estimates/quote")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&quote_request()).expect("body serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["pricingPolicy"], "detailed");
    assert_eq!(payload["breakdown"]["packingCost"], 80.0);
    assert_eq!(payload["range"], json!({ "min": 432, "max": 528 }));
}

#[tokio::test]
async fn fetch_handler_returns_stored_receipt() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let record = service.submit(submission()).expect("submission succeeds");

    let response = fetch_handler::<MemoryInbox>(
        State(service.clone()),
        axum::extract::Path(record.id.0.clone()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("submission_id").and_then(Value::as_str),
        Some(record.id.0.as_str())
    );
    assert_eq!(payload["full_name"], "Jane Smith");
    assert_eq!(payload["move_date"], "2025-03-11");
}

#[tokio::test]
async fn fetch_handler_returns_not_found_for_unknown_id() {
    let (service, _) = build_service();

    let response = fetch_handler::<MemoryInbox>(
        State(Arc::new(service)),
        axum::extract::Path("est-missing".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["submission_id"], "est-missing");
}
