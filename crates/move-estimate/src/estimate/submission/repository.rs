use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{EstimateSubmission, EstimatedCost, SubmissionId};
use crate::estimate::pricing::{CostBreakdown, PricingPolicyKind};

/// Stored lead. `submission.estimated_cost` holds the server-side figures;
/// whatever the client sent is kept in `client_estimate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub submission: EstimateSubmission,
    pub client_estimate: EstimatedCost,
    pub pricing_policy: PricingPolicyKind,
    pub breakdown: Option<CostBreakdown>,
    pub received_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn receipt(&self) -> SubmissionReceipt {
        SubmissionReceipt {
            submission_id: self.id.clone(),
            status: "received",
            full_name: self.submission.form.full_name.clone(),
            move_date: self.submission.form.move_date,
            estimated_cost: self.submission.estimated_cost,
            pricing_policy: self.pricing_policy.label(),
            received_at: self.received_at,
        }
    }
}

/// Storage abstraction for accepted leads.
pub trait SubmissionInbox: Send + Sync {
    fn accept(&self, record: SubmissionRecord) -> Result<SubmissionRecord, InboxError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, InboxError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    #[error("submission already exists")]
    Conflict,
    #[error("submission not found")]
    NotFound,
    #[error("inbox unavailable: {0}")]
    Unavailable(String),
}

/// What the caller gets back after submitting.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: SubmissionId,
    pub status: &'static str,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_date: Option<NaiveDate>,
    pub estimated_cost: EstimatedCost,
    pub pricing_policy: &'static str,
    pub received_at: DateTime<Utc>,
}
