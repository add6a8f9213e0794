use super::{CostBreakdown, PricingPolicy, PricingPolicyKind, QuoteRequest};
use crate::estimate::domain::{MoveSize, MoveType, TruckSize};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-mile cost of each truck class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckRates {
    pub cargo_van: f64,
    pub box_truck_small: f64,
    pub box_truck_medium: f64,
    pub box_truck_large: f64,
}

impl TruckRates {
    pub fn per_mile(&self, truck: TruckSize) -> f64 {
        match truck {
            TruckSize::CargoVan => self.cargo_van,
            TruckSize::BoxTruckSmall => self.box_truck_small,
            TruckSize::BoxTruckMedium => self.box_truck_medium,
            TruckSize::BoxTruckLarge => self.box_truck_large,
        }
    }
}

impl Default for TruckRates {
    fn default() -> Self {
        Self {
            cargo_van: 0.75,
            box_truck_small: 1.00,
            box_truck_medium: 1.25,
            box_truck_large: 1.50,
        }
    }
}

/// Rate table for the multi-factor formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedRateCard {
    pub base_prices: BTreeMap<String, f64>,
    pub fallback_base_price: f64,
    /// Truck overrides per size key; keys not listed use [`TruckSize::for_move_size`].
    #[serde(default)]
    pub truck_assignments: BTreeMap<String, TruckSize>,
    pub truck_rates: TruckRates,
    pub special_items_fee: f64,
    pub packing_rate: f64,
    pub weekend_multiplier: f64,
    pub peak_season_multiplier: f64,
    pub rush_hour_multiplier: f64,
    pub commercial_multiplier: f64,
    /// Inclusive calendar month range, 1-based.
    pub peak_season_months: (u32, u32),
    /// Inclusive clock-hour windows, weekdays only.
    pub rush_hour_windows: Vec<(u32, u32)>,
}

impl DetailedRateCard {
    pub fn standard() -> Self {
        let base_prices = [
            (MoveSize::STUDIO, 400.0),
            (MoveSize::SMALL, 600.0),
            (MoveSize::MEDIUM, 900.0),
            (MoveSize::LARGE, 1200.0),
        ]
        .into_iter()
        .map(|(key, price)| (key.to_string(), price))
        .collect();

        Self {
            base_prices,
            fallback_base_price: 800.0,
            truck_assignments: BTreeMap::new(),
            truck_rates: TruckRates::default(),
            special_items_fee: 150.0,
            packing_rate: 0.2,
            weekend_multiplier: 1.15,
            peak_season_multiplier: 1.10,
            rush_hour_multiplier: 1.15,
            commercial_multiplier: 1.2,
            peak_season_months: (5, 8),
            rush_hour_windows: vec![(7, 9), (16, 19)],
        }
    }

    pub fn base_price(&self, size: &MoveSize) -> f64 {
        self.base_prices
            .get(size.as_str())
            .copied()
            .unwrap_or(self.fallback_base_price)
    }

    pub fn truck_for(&self, size: &MoveSize) -> TruckSize {
        self.truck_assignments
            .get(size.as_str())
            .copied()
            .unwrap_or_else(|| TruckSize::for_move_size(size))
    }
}

impl Default for DetailedRateCard {
    fn default() -> Self {
        Self::standard()
    }
}

/// Calendar and clock conditions that raise the price of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeFactors {
    pub weekend: bool,
    pub peak_season: bool,
    pub rush_hour: bool,
}

impl TimeFactors {
    /// A missing clock time counts as midnight, which is never rush hour.
    pub fn evaluate(card: &DetailedRateCard, date: NaiveDate, time: Option<NaiveTime>) -> Self {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);

        let (first_month, last_month) = card.peak_season_months;
        let peak_season = (first_month..=last_month).contains(&date.month());

        let hour = time.map(|t| t.hour()).unwrap_or(0);
        let rush_hour = !weekend
            && card
                .rush_hour_windows
                .iter()
                .any(|(start, end)| (*start..=*end).contains(&hour));

        Self {
            weekend,
            peak_season,
            rush_hour,
        }
    }

    /// Applicable multipliers compounded in weekend, peak, rush-hour order.
    pub fn multiplier(&self, card: &DetailedRateCard) -> f64 {
        let mut multiplier = 1.0;
        if self.weekend {
            multiplier *= card.weekend_multiplier;
        }
        if self.peak_season {
            multiplier *= card.peak_season_multiplier;
        }
        if self.rush_hour {
            multiplier *= card.rush_hour_multiplier;
        }
        multiplier
    }
}

/// Multi-factor moving cost. The commercial multiplier applies to the
/// subtotal after time factors have been added.
pub fn calculate_moving_cost(request: &QuoteRequest, card: &DetailedRateCard) -> CostBreakdown {
    let base_price = card.base_price(&request.move_size);

    let truck = card.truck_for(&request.move_size);
    let distance_cost = request.distance_miles * card.truck_rates.per_mile(truck);

    let special_items_cost = if request.has_special_items {
        card.special_items_fee
    } else {
        0.0
    };

    let packing_cost = if request.needs_packing {
        base_price * card.packing_rate
    } else {
        0.0
    };

    let subtotal = base_price + distance_cost + special_items_cost + packing_cost;

    let time_multiplier =
        TimeFactors::evaluate(card, request.move_date, request.move_time).multiplier(card);
    let time_factors_cost = subtotal * (time_multiplier - 1.0);

    let type_multiplier = match request.move_type {
        MoveType::Commercial => card.commercial_multiplier,
        MoveType::Residential => 1.0,
    };
    let total_cost = (subtotal + time_factors_cost) * type_multiplier;

    CostBreakdown {
        base_price,
        distance_cost,
        special_items_cost,
        packing_cost,
        storage_cost: 0.0,
        access_cost: 0.0,
        time_factors_cost,
        time_multiplier,
        type_multiplier,
        total_cost,
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailedPricing {
    card: DetailedRateCard,
}

impl DetailedPricing {
    pub fn new(card: DetailedRateCard) -> Self {
        Self { card }
    }

    pub fn standard() -> Self {
        Self::new(DetailedRateCard::standard())
    }

    pub fn card(&self) -> &DetailedRateCard {
        &self.card
    }
}

impl PricingPolicy for DetailedPricing {
    fn kind(&self) -> PricingPolicyKind {
        PricingPolicyKind::Detailed
    }

    fn quote(&self, request: &QuoteRequest) -> CostBreakdown {
        calculate_moving_cost(request, &self.card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn at(hour: u32, minute: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    #[test]
    fn weekend_covers_saturday_and_sunday_only() {
        let card = DetailedRateCard::standard();
        // 2025-03-08 is a Saturday.
        assert!(TimeFactors::evaluate(&card, date(2025, 3, 8), None).weekend);
        assert!(TimeFactors::evaluate(&card, date(2025, 3, 9), None).weekend);
        assert!(!TimeFactors::evaluate(&card, date(2025, 3, 10), None).weekend);
    }

    #[test]
    fn peak_season_runs_may_through_august() {
        let card = DetailedRateCard::standard();
        assert!(!TimeFactors::evaluate(&card, date(2025, 4, 30), None).peak_season);
        assert!(TimeFactors::evaluate(&card, date(2025, 5, 1), None).peak_season);
        assert!(TimeFactors::evaluate(&card, date(2025, 8, 31), None).peak_season);
        assert!(!TimeFactors::evaluate(&card, date(2025, 9, 1), None).peak_season);
    }

    #[test]
    fn rush_hour_windows_are_inclusive_on_weekdays() {
        let card = DetailedRateCard::standard();
        let tuesday = date(2025, 3, 11);
        assert!(!TimeFactors::evaluate(&card, tuesday, at(6, 59)).rush_hour);
        assert!(TimeFactors::evaluate(&card, tuesday, at(7, 0)).rush_hour);
        assert!(TimeFactors::evaluate(&card, tuesday, at(9, 59)).rush_hour);
        assert!(!TimeFactors::evaluate(&card, tuesday, at(10, 0)).rush_hour);
        assert!(TimeFactors::evaluate(&card, tuesday, at(16, 0)).rush_hour);
        assert!(TimeFactors::evaluate(&card, tuesday, at(19, 30)).rush_hour);
        assert!(!TimeFactors::evaluate(&card, tuesday, at(20, 0)).rush_hour);
        assert!(!TimeFactors::evaluate(&card, tuesday, None).rush_hour);

        let saturday = date(2025, 3, 8);
        assert!(!TimeFactors::evaluate(&card, saturday, at(8, 0)).rush_hour);
    }

    #[test]
    fn all_three_factors_compound() {
        let card = DetailedRateCard::standard();
        // Friday in July at 5pm is peak season and rush hour; weekend does not apply.
        let factors = TimeFactors::evaluate(&card, date(2025, 7, 18), at(17, 0));
        assert_eq!(
            factors,
            TimeFactors {
                weekend: false,
                peak_season: true,
                rush_hour: true,
            }
        );
        assert_eq!(factors.multiplier(&card), 1.0 * 1.10 * 1.15);
    }

    #[test]
    fn truck_overrides_take_precedence() {
        let mut card = DetailedRateCard::standard();
        card.truck_assignments
            .insert("office-large".to_string(), TruckSize::BoxTruckLarge);

        assert_eq!(card.truck_for(&MoveSize::new("office-large")), TruckSize::BoxTruckLarge);
        assert_eq!(card.truck_for(&MoveSize::new("office-small")), TruckSize::BoxTruckMedium);
        assert_eq!(card.truck_for(&MoveSize::studio()), TruckSize::CargoVan);
    }
}
