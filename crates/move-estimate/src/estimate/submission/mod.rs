//! Estimate lead intake.
//!
//! Packages a completed wizard form with its estimate, validates it the way
//! the public endpoint does, re-prices it server-side, and hands the record to
//! a [`SubmissionInbox`].

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
mod validation;

#[cfg(test)]
mod tests;

pub use domain::{EstimateSubmission, EstimatedCost, Quote, SubmissionId};
pub use repository::{InboxError, SubmissionInbox, SubmissionReceipt, SubmissionRecord};
pub use router::estimate_router;
pub use service::{EstimateService, ServiceError};
pub use validation::{validate_submission, FieldIssue};
