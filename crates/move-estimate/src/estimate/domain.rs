use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    #[default]
    Residential,
    Commercial,
}

impl MoveType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
        }
    }
}

/// Size tier key. The key set is open: pricing tables decide which keys they
/// recognise and fall back to a default price for the rest.
///
/// Keys are stored trimmed and lowercased, whether built in code, read from a
/// rate card, or deserialized from a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct MoveSize(String);

impl MoveSize {
    pub const STUDIO: &'static str = "studio";
    pub const SMALL: &'static str = "small";
    pub const MEDIUM: &'static str = "medium";
    pub const LARGE: &'static str = "large";

    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Self::normalize(key.as_ref()))
    }

    /// Canonical spelling of a size key, used for every table lookup.
    pub fn normalize(key: &str) -> String {
        key.trim().to_ascii_lowercase()
    }

    pub fn studio() -> Self {
        Self::new(Self::STUDIO)
    }

    pub fn small() -> Self {
        Self::new(Self::SMALL)
    }

    pub fn medium() -> Self {
        Self::new(Self::MEDIUM)
    }

    pub fn large() -> Self {
        Self::new(Self::LARGE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_set(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for MoveSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MoveSize {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MoveSize {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckSize {
    CargoVan,
    BoxTruckSmall,
    BoxTruckMedium,
    BoxTruckLarge,
}

impl TruckSize {
    /// Default truck assignment for the standard size keys.
    pub fn for_move_size(size: &MoveSize) -> Self {
        match size.as_str() {
            MoveSize::STUDIO => Self::CargoVan,
            MoveSize::SMALL => Self::BoxTruckSmall,
            MoveSize::MEDIUM => Self::BoxTruckMedium,
            MoveSize::LARGE => Self::BoxTruckLarge,
            _ => Self::BoxTruckMedium,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cargo_van" => Some(Self::CargoVan),
            "box_truck_small" => Some(Self::BoxTruckSmall),
            "box_truck_medium" => Some(Self::BoxTruckMedium),
            "box_truck_large" => Some(Self::BoxTruckLarge),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CargoVan => "Cargo Van",
            Self::BoxTruckSmall => "Small Box Truck",
            Self::BoxTruckMedium => "Medium Box Truck",
            Self::BoxTruckLarge => "Large Box Truck",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "lng", alias = "longitude")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    Latitude(f64),
    Longitude(f64),
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::Latitude(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            CoordinateError::Longitude(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

/// Mutable record collected by the estimate wizard.
///
/// Coordinates are only present after a concrete address selection has been
/// confirmed; free-typed address text leaves them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateFormData {
    #[serde(default)]
    pub move_type: MoveType,
    #[serde(default)]
    pub from_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_coordinates: Option<Coordinates>,
    #[serde(default)]
    pub to_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_coordinates: Option<Coordinates>,
    #[serde(default)]
    pub move_size: Option<MoveSize>,
    #[serde(default)]
    pub move_date: Option<NaiveDate>,
    #[serde(default, with = "clock_time", skip_serializing_if = "Option::is_none")]
    pub move_time: Option<NaiveTime>,
    #[serde(default)]
    pub has_special_items: bool,
    #[serde(default)]
    pub needs_packing: bool,
    #[serde(default)]
    pub needs_storage: bool,
    #[serde(default)]
    pub has_elevator: bool,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl Default for EstimateFormData {
    fn default() -> Self {
        Self {
            move_type: MoveType::Residential,
            from_address: String::new(),
            from_coordinates: None,
            to_address: String::new(),
            to_coordinates: None,
            move_size: Some(MoveSize::medium()),
            move_date: None,
            move_time: None,
            has_special_items: false,
            needs_packing: false,
            needs_storage: false,
            has_elevator: false,
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

impl EstimateFormData {
    /// Size key when one has been chosen.
    pub fn selected_size(&self) -> Option<&MoveSize> {
        self.move_size.as_ref().filter(|size| size.is_set())
    }

    pub fn route(&self) -> Option<(Coordinates, Coordinates)> {
        match (self.from_coordinates, self.to_coordinates) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }
}

/// `HH:MM` clock values as produced by time inputs; seconds are accepted too.
pub(crate) mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn parse(raw: &str) -> Option<NaiveTime> {
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;
        match opt {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid clock time '{raw}'"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_out_of_range_values() {
        assert!(Coordinates::new(38.9, -77.0).is_ok());
        assert_eq!(
            Coordinates::new(91.0, 0.0),
            Err(CoordinateError::Latitude(91.0))
        );
        assert!(matches!(
            Coordinates::new(0.0, f64::NAN),
            Err(CoordinateError::Longitude(_))
        ));
    }

    #[test]
    fn unknown_sizes_use_medium_truck() {
        assert_eq!(
            TruckSize::for_move_size(&MoveSize::studio()),
            TruckSize::CargoVan
        );
        assert_eq!(
            TruckSize::for_move_size(&MoveSize::new("office-large")),
            TruckSize::BoxTruckMedium
        );
    }

    #[test]
    fn size_keys_are_trimmed_and_lowercased() {
        assert_eq!(MoveSize::new(" Studio "), MoveSize::studio());
        assert_eq!(MoveSize::from("OFFICE-Large"), MoveSize::new("office-large"));
        assert!(!MoveSize::new("   ").is_set());

        let parsed: MoveSize = serde_json::from_str("\"Large\"").expect("size parses");
        assert_eq!(parsed, MoveSize::large());
        assert_eq!(
            serde_json::to_value(&parsed).expect("size serializes"),
            serde_json::json!("large")
        );
    }

    #[test]
    fn form_data_round_trips_camel_case_json() {
        let payload = serde_json::json!({
            "moveType": "commercial",
            "fromAddress": "123 Main St",
            "fromCoordinates": { "lat": 38.9072, "lng": -77.0365 },
            "toAddress": "456 Oak Ave",
            "moveSize": "large",
            "moveDate": "2025-06-14",
            "moveTime": "08:30",
            "hasSpecialItems": true,
            "needsPacking": false,
            "fullName": "Jane Smith",
            "email": "jane@example.com",
            "phone": "555-0100"
        });

        let form: EstimateFormData = serde_json::from_value(payload).expect("form parses");
        assert_eq!(form.move_type, MoveType::Commercial);
        assert_eq!(form.move_time, NaiveTime::from_hms_opt(8, 30, 0));
        assert!(form.to_coordinates.is_none());
        assert!(form.route().is_none());

        let value = serde_json::to_value(&form).expect("form serializes");
        assert_eq!(value["moveTime"], "08:30");
        assert_eq!(value["fromCoordinates"]["lat"], 38.9072);
    }
}
