use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Curated dataset bundled into the binary; a file on disk can override it.
const BUNDLED_DATA: &str = include_str!("../data/travel_data.json");

/// One hand-written place description from the curated dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub city: String,
    pub country: String,
    pub history: String,
    pub culture: String,
    pub language: String,
    pub attractions: Vec<String>,
}

impl PlaceRecord {
    /// "City, Country" as shown in API responses.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    /// Flatten the record into the plain-text info blob the API returns.
    pub fn info_text(&self) -> String {
        format!(
            "History: {}\n\nCulture: {}\n\nLanguage: {}\n\nAttractions: {}",
            self.history,
            self.culture,
            self.language,
            self.attractions.join(", ")
        )
    }
}

/// Read-only collection of curated places, loaded once at startup.
pub struct TravelDataset {
    places: Vec<PlaceRecord>,
}

impl TravelDataset {
    /// Dataset compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DATA).context("Bundled travel dataset is invalid")
    }

    /// Dataset from a user-supplied JSON file (same schema as the bundled one).
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to parse dataset file: {}", path.display()))
    }

    fn from_json(raw: &str) -> Result<Self> {
        let places: Vec<PlaceRecord> = serde_json::from_str(raw)?;
        Ok(TravelDataset { places })
    }

    /// Case-insensitive lookup by city name.
    pub fn find_city(&self, name: &str) -> Option<&PlaceRecord> {
        let wanted = name.to_lowercase();
        self.places.iter().find(|p| p.city.to_lowercase() == wanted)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
