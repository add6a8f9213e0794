use super::domain::Coordinates;
use serde::{Deserialize, Serialize};

/// Selection result handed over by the address autocomplete collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResult {
    pub full_address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl PlaceResult {
    pub fn new(full_address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            full_address: full_address.into(),
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// Geometry, when both components are present and within range.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressTarget {
    From,
    To,
}

impl AddressTarget {
    pub const fn label(self) -> &'static str {
        match self {
            Self::From => "origin",
            Self::To => "destination",
        }
    }
}

/// Marks one edit of an address field. A lookup that resolves after a newer
/// edit carries an outdated revision and is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRevision {
    pub target: AddressTarget,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RevisionCounter {
    from: u64,
    to: u64,
}

impl RevisionCounter {
    pub(crate) fn bump(&mut self, target: AddressTarget) -> AddressRevision {
        let slot = self.slot_mut(target);
        *slot += 1;
        AddressRevision {
            target,
            sequence: *slot,
        }
    }

    pub(crate) fn is_current(&self, revision: AddressRevision) -> bool {
        let latest = match revision.target {
            AddressTarget::From => self.from,
            AddressTarget::To => self.to,
        };
        latest == revision.sequence
    }

    fn slot_mut(&mut self, target: AddressTarget) -> &mut u64 {
        match target {
            AddressTarget::From => &mut self.from,
            AddressTarget::To => &mut self.to,
        }
    }
}

/// Rectangular area the company serves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub southwest: Coordinates,
    pub northeast: Coordinates,
}

impl ServiceArea {
    /// Washington DC, Maryland and Northern Virginia.
    pub fn dmv() -> Self {
        Self {
            southwest: Coordinates {
                latitude: 38.5,
                longitude: -78.0,
            },
            northeast: Coordinates {
                latitude: 39.5,
                longitude: -76.5,
            },
        }
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.southwest.latitude..=self.northeast.latitude).contains(&point.latitude)
            && (self.southwest.longitude..=self.northeast.longitude).contains(&point.longitude)
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        Self::dmv()
    }
}
