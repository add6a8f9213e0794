use std::fmt;

use serde::{Deserialize, Serialize};

use crate::estimate::domain::EstimateFormData;
use crate::estimate::pricing::{CostBreakdown, PriceRange, PricingPolicyKind};
use crate::estimate::wizard::DerivedEstimate;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Price band and whole-mile distance attached to a submitted lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedCost {
    pub min: i64,
    pub max: i64,
    pub distance: u32,
}

impl From<&DerivedEstimate> for EstimatedCost {
    fn from(derived: &DerivedEstimate) -> Self {
        Self {
            min: derived.min,
            max: derived.max,
            distance: derived.distance,
        }
    }
}

/// Wire payload: every form field at the top level plus `estimatedCost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSubmission {
    #[serde(flatten)]
    pub form: EstimateFormData,
    #[serde(default)]
    pub estimated_cost: EstimatedCost,
}

impl EstimateSubmission {
    pub fn new(form: EstimateFormData, derived: &DerivedEstimate) -> Self {
        Self {
            form,
            estimated_cost: EstimatedCost::from(derived),
        }
    }
}

/// Response body for a one-off quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub pricing_policy: PricingPolicyKind,
    pub breakdown: CostBreakdown,
    pub range: PriceRange,
}
