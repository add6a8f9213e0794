use super::detailed::DetailedRateCard;
use crate::estimate::domain::{MoveSize, TruckSize};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Display metadata for the size keys offered by a rate card.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MoveSizeCatalog {
    entries: BTreeMap<String, MoveSizeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveSizeEntry {
    pub label: String,
    pub description: Option<String>,
}

impl MoveSizeCatalog {
    pub fn standard() -> Self {
        let entries = [
            (MoveSize::STUDIO, "Studio", "1-2 rooms"),
            (MoveSize::SMALL, "Small", "2-3 rooms"),
            (MoveSize::MEDIUM, "Medium", "3-4 rooms"),
            (MoveSize::LARGE, "Large", "4+ rooms"),
        ]
        .into_iter()
        .map(|(key, label, description)| {
            (
                key.to_string(),
                MoveSizeEntry {
                    label: label.to_string(),
                    description: Some(description.to_string()),
                },
            )
        })
        .collect();

        Self { entries }
    }

    /// Human label, or the raw key for sizes the catalog does not know.
    pub fn label_for(&self, size: &MoveSize) -> String {
        self.entries
            .get(size.as_str())
            .map(|entry| entry.label.clone())
            .unwrap_or_else(|| size.to_string())
    }

    pub fn get(&self, size: &MoveSize) -> Option<&MoveSizeEntry> {
        self.entries.get(size.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MoveSizeEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateCardError {
    #[error("failed to read rate card: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate card CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("size '{size}' has invalid base price {price}")]
    InvalidPrice { size: String, price: f64 },
    #[error("size '{size}' references unknown truck '{truck}'")]
    UnknownTruck { size: String, truck: String },
}

/// Loads size tiers from a CSV export with `size,label,base_price,truck`
/// columns and layers them over the standard detailed rate card.
pub struct RateCardImporter;

impl RateCardImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(DetailedRateCard, MoveSizeCatalog), RateCardError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<(DetailedRateCard, MoveSizeCatalog), RateCardError> {
        let mut card = DetailedRateCard::standard();
        let mut catalog = MoveSizeCatalog::standard();

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        for record in csv_reader.deserialize::<RateCardRow>() {
            let row = record?;
            let size = MoveSize::normalize(&row.size);

            if !row.base_price.is_finite() || row.base_price < 0.0 {
                return Err(RateCardError::InvalidPrice {
                    size,
                    price: row.base_price,
                });
            }

            if let Some(truck) = row.truck.as_deref() {
                let parsed = TruckSize::parse(truck).ok_or_else(|| RateCardError::UnknownTruck {
                    size: size.clone(),
                    truck: truck.to_string(),
                })?;
                card.truck_assignments.insert(size.clone(), parsed);
            }

            card.base_prices.insert(size.clone(), row.base_price);
            catalog.entries.insert(
                size.clone(),
                MoveSizeEntry {
                    label: row.label.unwrap_or_else(|| size.clone()),
                    description: row.description,
                },
            );
        }

        Ok((card, catalog))
    }
}

#[derive(Debug, Deserialize)]
struct RateCardRow {
    size: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    label: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    base_price: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    truck: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
