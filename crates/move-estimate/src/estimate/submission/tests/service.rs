use super::common::*;
use std::sync::Arc;

use crate::estimate::pricing::{FlatPricing, PricingPolicyKind};
use crate::estimate::submission::domain::{EstimatedCost, SubmissionId};
use crate::estimate::submission::repository::InboxError;
use crate::estimate::submission::{EstimateService, ServiceError};

#[test]
fn submit_stores_server_quote() {
    let (service, inbox) = build_service();

    let record = service.submit(submission()).expect("submission succeeds");

    assert!(record.id.0.starts_with("est-"));
    assert_eq!(record.pricing_policy, PricingPolicyKind::Detailed);
    assert_eq!(
        record.submission.estimated_cost,
        EstimatedCost {
            min: 363,
            max: 443,
            distance: 4
        }
    );
    let breakdown = record.breakdown.expect("breakdown stored");
    assert_eq!(breakdown.base_price, 400.0);
    assert_eq!(inbox.len(), 1);
}

#[test]
fn each_service_numbers_its_own_submissions() {
    let (first, _) = build_service();
    let (second, _) = build_service();

    let a = first.submit(submission()).expect("first submission succeeds");
    let b = first.submit(submission()).expect("second submission succeeds");
    let c = second.submit(submission()).expect("other service submission succeeds");

    assert_eq!(a.id, SubmissionId("est-000001".to_string()));
    assert_eq!(b.id, SubmissionId("est-000002".to_string()));
    assert_eq!(c.id, SubmissionId("est-000001".to_string()));
}

#[test]
fn submit_replaces_tampered_client_estimate() {
    let (service, _) = build_service();
    let mut tampered = submission();
    tampered.estimated_cost = EstimatedCost {
        min: 1,
        max: 2,
        distance: 4,
    };

    let record = service.submit(tampered).expect("submission succeeds");

    assert_eq!(record.client_estimate.min, 1);
    assert_eq!(record.submission.estimated_cost.min, 363);
    assert_eq!(record.submission.estimated_cost.max, 443);
}

#[test]
fn submit_rejects_invalid_contact_details() {
    let (service, inbox) = build_service();
    let mut invalid = submission();
    invalid.form.email = "jane.example.com".to_string();

    let error = service.submit(invalid).expect_err("validation fails");

    match error {
        ServiceError::Invalid(issues) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, "email");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(inbox.len(), 0);
}

#[test]
fn submit_propagates_inbox_failures() {
    let service = EstimateService::new(
        Arc::new(UnavailableInbox),
        PricingPolicyKind::Detailed.build(),
    );

    let error = service.submit(submission()).expect_err("inbox is offline");
    assert!(matches!(error, ServiceError::Inbox(InboxError::Unavailable(_))));
}

#[test]
fn flat_policy_prices_submissions_with_its_own_table() {
    let inbox = Arc::new(MemoryInbox::default());
    let service = EstimateService::new(inbox, Arc::new(FlatPricing::standard()));

    let record = service.submit(submission()).expect("submission succeeds");

    assert_eq!(record.pricing_policy, PricingPolicyKind::Flat);
    assert_eq!(
        record.submission.estimated_cost,
        EstimatedCost {
            min: 360,
            max: 440,
            distance: 4
        }
    );
}

#[test]
fn quote_prices_request_and_rejects_negative_distance() {
    let (service, _) = build_service();

    let quote = service.quote(&quote_request()).expect("quote succeeds");
    assert_eq!(quote.breakdown.total_cost, 480.0);
    assert_eq!((quote.range.min, quote.range.max), (432, 528));

    let mut request = quote_request();
    request.distance_miles = -3.0;
    assert!(matches!(
        service.quote(&request),
        Err(ServiceError::Invalid(_))
    ));
}

#[test]
fn get_reports_missing_submissions() {
    let (service, _) = build_service();

    let error = service
        .get(&SubmissionId("est-999999".to_string()))
        .expect_err("nothing stored");
    assert!(matches!(error, ServiceError::Inbox(InboxError::NotFound)));
}
