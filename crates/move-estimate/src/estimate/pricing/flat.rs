use super::{CostBreakdown, PricingPolicy, PricingPolicyKind, QuoteRequest};
use crate::estimate::domain::{MoveSize, MoveType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distance bands used by the flat formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceTier {
    #[serde(rename = "0-50")]
    Local,
    #[serde(rename = "51-100")]
    Short,
    #[serde(rename = "101-250")]
    Medium,
    #[serde(rename = "251+")]
    Long,
}

impl DistanceTier {
    pub const fn ordered() -> [Self; 4] {
        [Self::Local, Self::Short, Self::Medium, Self::Long]
    }

    /// Inclusive upper bound in miles; the last tier is open-ended.
    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            Self::Local => Some(50.0),
            Self::Short => Some(100.0),
            Self::Medium => Some(250.0),
            Self::Long => None,
        }
    }

    /// First tier whose upper bound `miles` does not exceed.
    pub fn for_distance(miles: f64) -> Self {
        Self::ordered()
            .into_iter()
            .find(|tier| tier.upper_bound().map_or(true, |bound| miles <= bound))
            .unwrap_or(Self::Long)
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Local => 1.0,
            Self::Short => 1.5,
            Self::Medium => 2.0,
            Self::Long => 2.5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "Local (0-50 miles)",
            Self::Short => "Short Distance (51-100 miles)",
            Self::Medium => "Medium Distance (101-250 miles)",
            Self::Long => "Long Distance (251+ miles)",
        }
    }
}

/// Rate table for the flat add-on formula.
///
/// Sizes missing from `base_prices` are quoted at `fallback_base_price`
/// rather than at zero, so an unlisted size never produces a free move and
/// both policies agree on what an unknown size costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRateCard {
    pub base_prices: BTreeMap<String, f64>,
    pub fallback_base_price: f64,
    pub packing_fee: f64,
    pub storage_fee: f64,
    pub special_items_fee: f64,
    pub no_elevator_fee: f64,
    /// Size keys that pay the no-elevator surcharge.
    pub walk_up_sizes: Vec<String>,
    pub commercial_multiplier: f64,
}

impl FlatRateCard {
    pub fn standard() -> Self {
        let base_prices = [
            ("studio", 400.0),
            ("1bed", 600.0),
            ("2bed", 800.0),
            ("3bed", 1200.0),
            ("4bed", 1600.0),
            ("office-small", 800.0),
            ("office-medium", 1400.0),
            ("office-large", 2200.0),
        ]
        .into_iter()
        .map(|(key, price)| (key.to_string(), price))
        .collect();

        Self {
            base_prices,
            fallback_base_price: 800.0,
            packing_fee: 300.0,
            storage_fee: 200.0,
            special_items_fee: 250.0,
            no_elevator_fee: 100.0,
            walk_up_sizes: ["1bed", "2bed", "3bed", "4bed"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            commercial_multiplier: 1.2,
        }
    }

    pub fn base_price(&self, size: &MoveSize) -> f64 {
        self.base_prices
            .get(size.as_str())
            .copied()
            .unwrap_or(self.fallback_base_price)
    }

    fn charges_walk_up(&self, size: &MoveSize) -> bool {
        self.walk_up_sizes.iter().any(|key| key == size.as_str())
    }
}

impl Default for FlatRateCard {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlatPricing {
    card: FlatRateCard,
}

impl FlatPricing {
    pub fn new(card: FlatRateCard) -> Self {
        Self { card }
    }

    pub fn standard() -> Self {
        Self::new(FlatRateCard::standard())
    }

    pub fn card(&self) -> &FlatRateCard {
        &self.card
    }
}

impl PricingPolicy for FlatPricing {
    fn kind(&self) -> PricingPolicyKind {
        PricingPolicyKind::Flat
    }

    fn quote(&self, request: &QuoteRequest) -> CostBreakdown {
        let card = &self.card;
        let base_price = card.base_price(&request.move_size);
        let tier = DistanceTier::for_distance(request.distance_miles);
        let distance_cost = base_price * (tier.multiplier() - 1.0);

        let packing_cost = if request.needs_packing {
            card.packing_fee
        } else {
            0.0
        };
        let storage_cost = if request.needs_storage {
            card.storage_fee
        } else {
            0.0
        };
        let special_items_cost = if request.has_special_items {
            card.special_items_fee
        } else {
            0.0
        };
        let access_cost = if !request.has_elevator && card.charges_walk_up(&request.move_size) {
            card.no_elevator_fee
        } else {
            0.0
        };

        let type_multiplier = match request.move_type {
            MoveType::Commercial => card.commercial_multiplier,
            MoveType::Residential => 1.0,
        };
        let subtotal = base_price * tier.multiplier()
            + packing_cost
            + storage_cost
            + special_items_cost
            + access_cost;

        CostBreakdown {
            base_price,
            distance_cost,
            special_items_cost,
            packing_cost,
            storage_cost,
            access_cost,
            time_factors_cost: 0.0,
            time_multiplier: 1.0,
            type_multiplier,
            total_cost: subtotal * type_multiplier,
        }
    }
}
