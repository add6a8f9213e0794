//! Pricing policies that turn a move description into a cost breakdown.
//!
//! Two formulas are in use across the estimate pages and they disagree for
//! identical inputs: the multi-factor [`DetailedPricing`] (truck rates, time
//! multipliers) and the flat add-on [`FlatPricing`]. Both sit behind the
//! [`PricingPolicy`] trait so the caller picks one explicitly.

mod detailed;
mod flat;
mod rate_card;

pub use detailed::{
    calculate_moving_cost, DetailedPricing, DetailedRateCard, TimeFactors, TruckRates,
};
pub use flat::{DistanceTier, FlatPricing, FlatRateCard};
pub use rate_card::{MoveSizeCatalog, MoveSizeEntry, RateCardError, RateCardImporter};

use super::domain::{EstimateFormData, MoveSize, MoveType};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Input shared by every pricing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub move_type: MoveType,
    pub move_size: MoveSize,
    pub distance_miles: f64,
    pub move_date: NaiveDate,
    #[serde(
        default,
        with = "super::domain::clock_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub move_time: Option<NaiveTime>,
    #[serde(default)]
    pub has_special_items: bool,
    #[serde(default)]
    pub needs_packing: bool,
    #[serde(default)]
    pub needs_storage: bool,
    #[serde(default)]
    pub has_elevator: bool,
}

impl QuoteRequest {
    /// Builds a request from wizard data once size and date are both known.
    pub fn from_form(form: &EstimateFormData, distance_miles: f64) -> Option<Self> {
        let move_size = form.selected_size()?.clone();
        let move_date = form.move_date?;

        Some(Self {
            move_type: form.move_type,
            move_size,
            distance_miles,
            move_date,
            move_time: form.move_time,
            has_special_items: form.has_special_items,
            needs_packing: form.needs_packing,
            needs_storage: form.needs_storage,
            has_elevator: form.has_elevator,
        })
    }
}

/// Itemised cost in dollars. Components a policy does not use stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub base_price: f64,
    pub distance_cost: f64,
    pub special_items_cost: f64,
    pub packing_cost: f64,
    pub storage_cost: f64,
    pub access_cost: f64,
    pub time_factors_cost: f64,
    pub time_multiplier: f64,
    pub type_multiplier: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    pub fn price_range(&self) -> PriceRange {
        generate_price_range(self.total_cost)
    }
}

/// Display band around a point estimate, in whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

/// ±10% band around `cost`, each bound rounded to the nearest dollar
/// (halves round away from zero).
pub fn generate_price_range(cost: f64) -> PriceRange {
    PriceRange {
        min: (cost * 0.9).round() as i64,
        max: (cost * 1.1).round() as i64,
    }
}

pub trait PricingPolicy: Send + Sync {
    fn kind(&self) -> PricingPolicyKind;
    fn quote(&self, request: &QuoteRequest) -> CostBreakdown;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPolicyKind {
    #[default]
    Detailed,
    Flat,
}

impl PricingPolicyKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "detailed" | "multi_factor" | "multi-factor" => Some(Self::Detailed),
            "flat" | "simple" => Some(Self::Flat),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Flat => "flat",
        }
    }

    /// Policy with the standard rate card for this kind.
    pub fn build(self) -> Arc<dyn PricingPolicy> {
        match self {
            Self::Detailed => Arc::new(DetailedPricing::standard()),
            Self::Flat => Arc::new(FlatPricing::standard()),
        }
    }
}

impl fmt::Display for PricingPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
