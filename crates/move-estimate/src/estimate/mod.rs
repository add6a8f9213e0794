//! Moving cost estimation and the estimate wizard.

pub mod address;
pub mod distance;
pub mod domain;
pub mod pricing;
pub mod submission;
pub mod wizard;

pub use address::{AddressRevision, AddressTarget, PlaceResult, ServiceArea};
pub use distance::calculate_distance;
pub use domain::{
    CoordinateError, Coordinates, EstimateFormData, MoveSize, MoveType, TruckSize,
};
pub use pricing::{
    generate_price_range, CostBreakdown, PriceRange, PricingPolicy, PricingPolicyKind,
    QuoteRequest,
};
pub use submission::{EstimateService, EstimateSubmission, EstimatedCost};
pub use wizard::{DerivedEstimate, EstimateWizard, FieldUpdate, Navigation, WizardStep};
