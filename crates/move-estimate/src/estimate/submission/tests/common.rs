use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::estimate::domain::{Coordinates, EstimateFormData, MoveSize, MoveType};
use crate::estimate::pricing::{DetailedPricing, QuoteRequest};
use crate::estimate::submission::domain::{EstimateSubmission, EstimatedCost, SubmissionId};
use crate::estimate::submission::repository::{InboxError, SubmissionInbox, SubmissionRecord};
use crate::estimate::submission::{estimate_router, EstimateService};

pub(super) fn form() -> EstimateFormData {
    EstimateFormData {
        move_type: MoveType::Residential,
        from_address: "123 Main St, Washington, DC".to_string(),
        from_coordinates: Some(Coordinates::new(38.9072, -77.0365).expect("valid origin")),
        to_address: "456 Oak Ave, Arlington, VA".to_string(),
        to_coordinates: Some(Coordinates::new(38.8799, -77.1060).expect("valid destination")),
        move_size: Some(MoveSize::studio()),
        move_date: Some(NaiveDate::from_ymd_opt(2025, 3, 11).expect("valid date")),
        move_time: NaiveTime::from_hms_opt(10, 0, 0),
        has_special_items: false,
        needs_packing: false,
        needs_storage: false,
        has_elevator: true,
        full_name: "Jane Smith".to_string(),
        email: "jane@example.com".to_string(),
        phone: "202-555-0100".to_string(),
    }
}

/// Studio move of roughly four miles on a Tuesday morning:
/// 400 + 4.19 * 0.75 = 403.14, quoted as 363..=443.
pub(super) fn submission() -> EstimateSubmission {
    EstimateSubmission {
        form: form(),
        estimated_cost: EstimatedCost {
            min: 363,
            max: 443,
            distance: 4,
        },
    }
}

pub(super) fn quote_request() -> QuoteRequest {
    QuoteRequest {
        move_type: MoveType::Residential,
        move_size: MoveSize::studio(),
        distance_miles: 0.0,
        move_date: NaiveDate::from_ymd_opt(2025, 3, 11).expect("valid date"),
        move_time: NaiveTime::from_hms_opt(10, 0, 0),
        has_special_items: false,
        needs_packing: true,
        needs_storage: false,
        has_elevator: true,
    }
}

pub(super) fn build_service() -> (EstimateService<MemoryInbox>, Arc<MemoryInbox>) {
    let inbox = Arc::new(MemoryInbox::default());
    let service = EstimateService::new(inbox.clone(), Arc::new(DetailedPricing::standard()));
    (service, inbox)
}

pub(super) fn estimate_router_with_service(service: EstimateService<MemoryInbox>) -> axum::Router {
    estimate_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryInbox {
    pub(super) records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl MemoryInbox {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("inbox mutex poisoned").len()
    }
}

impl SubmissionInbox for MemoryInbox {
    fn accept(&self, record: SubmissionRecord) -> Result<SubmissionRecord, InboxError> {
        let mut guard = self.records.lock().expect("inbox mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(InboxError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, InboxError> {
        let guard = self.records.lock().expect("inbox mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct ConflictInbox;

impl SubmissionInbox for ConflictInbox {
    fn accept(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, InboxError> {
        Err(InboxError::Conflict)
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, InboxError> {
        Ok(None)
    }
}

pub(super) struct UnavailableInbox;

impl SubmissionInbox for UnavailableInbox {
    fn accept(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, InboxError> {
        Err(InboxError::Unavailable("mail relay offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, InboxError> {
        Err(InboxError::Unavailable("mail relay offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
