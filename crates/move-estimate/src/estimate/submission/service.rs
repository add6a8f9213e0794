use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{EstimateSubmission, EstimatedCost, Quote, SubmissionId};
use super::repository::{InboxError, SubmissionInbox, SubmissionRecord};
use super::validation::{validate_submission, FieldIssue};
use crate::estimate::pricing::{PricingPolicy, PricingPolicyKind, QuoteRequest};
use crate::estimate::wizard::recompute;

/// Service composing the pricing policy and the submission inbox.
pub struct EstimateService<I> {
    inbox: Arc<I>,
    policy: Arc<dyn PricingPolicy>,
    /// Next submission number; each service numbers its own inbox.
    sequence: AtomicU64,
}

impl<I> EstimateService<I>
where
    I: SubmissionInbox + 'static,
{
    pub fn new(inbox: Arc<I>, policy: Arc<dyn PricingPolicy>) -> Self {
        Self {
            inbox,
            policy,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_submission_id(&self) -> SubmissionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SubmissionId(format!("est-{id:06}"))
    }

    pub fn policy_kind(&self) -> PricingPolicyKind {
        self.policy.kind()
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<Quote, ServiceError> {
        if !request.distance_miles.is_finite() || request.distance_miles < 0.0 {
            return Err(ServiceError::Invalid(vec![FieldIssue {
                field: "distanceMiles",
                message: "Distance must be a non-negative number of miles".to_string(),
            }]));
        }

        let breakdown = self.policy.quote(request);
        Ok(Quote {
            pricing_policy: self.policy.kind(),
            breakdown,
            range: breakdown.price_range(),
        })
    }

    /// Validate and re-price a lead, then store it. The client's estimate is
    /// kept for reference only.
    pub fn submit(
        &self,
        submission: EstimateSubmission,
    ) -> Result<SubmissionRecord, ServiceError> {
        let issues = validate_submission(&submission.form);
        if !issues.is_empty() {
            return Err(ServiceError::Invalid(issues));
        }

        let derived = recompute(&submission.form, self.policy.as_ref())
            .filter(|derived| derived.has_price())
            .ok_or(ServiceError::Unpriceable)?;
        let quoted = EstimatedCost::from(&derived);
        let client_estimate = submission.estimated_cost;

        if client_estimate != quoted {
            warn!(
                client_min = client_estimate.min,
                client_max = client_estimate.max,
                quoted_min = quoted.min,
                quoted_max = quoted.max,
                "submitted estimate differs from server quote"
            );
        }

        let record = SubmissionRecord {
            id: self.next_submission_id(),
            submission: EstimateSubmission {
                form: submission.form,
                estimated_cost: quoted,
            },
            client_estimate,
            pricing_policy: self.policy.kind(),
            breakdown: derived.breakdown,
            received_at: Utc::now(),
        };

        let stored = self.inbox.accept(record)?;
        info!(
            submission_id = %stored.id,
            min = quoted.min,
            max = quoted.max,
            distance = quoted.distance,
            "estimate submission accepted"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, ServiceError> {
        let record = self.inbox.fetch(id)?.ok_or(InboxError::NotFound)?;
        Ok(record)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("submission failed validation ({} field(s))", .0.len())]
    Invalid(Vec<FieldIssue>),
    #[error("estimate could not be priced")]
    Unpriceable,
    #[error(transparent)]
    Inbox(#[from] InboxError),
}
