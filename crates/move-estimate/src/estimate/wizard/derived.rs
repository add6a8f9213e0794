use crate::estimate::distance::calculate_distance;
use crate::estimate::domain::EstimateFormData;
use crate::estimate::pricing::{CostBreakdown, PricingPolicy, QuoteRequest};
use serde::{Deserialize, Serialize};

/// Values shown alongside the wizard: whole-mile distance and the price band.
///
/// `min` and `max` stay at zero until size and date are known, so the
/// distance can be shown before a price can.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedEstimate {
    pub distance: u32,
    pub min: i64,
    pub max: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostBreakdown>,
}

impl DerivedEstimate {
    pub fn has_price(&self) -> bool {
        self.breakdown.is_some()
    }
}

/// Recomputes the derived estimate from scratch.
///
/// Returns `None` while either address lacks confirmed coordinates; callers
/// keep whatever they showed before.
pub fn recompute(form: &EstimateFormData, policy: &dyn PricingPolicy) -> Option<DerivedEstimate> {
    let (origin, destination) = form.route()?;
    let miles = calculate_distance(origin, destination);
    let distance = miles.round() as u32;

    let Some(request) = QuoteRequest::from_form(form, miles) else {
        return Some(DerivedEstimate {
            distance,
            ..DerivedEstimate::default()
        });
    };

    let breakdown = policy.quote(&request);
    let range = breakdown.price_range();

    Some(DerivedEstimate {
        distance,
        min: range.min,
        max: range.max,
        breakdown: Some(breakdown),
    })
}
