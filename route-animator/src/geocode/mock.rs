//! Fixed-table geocoder for testing without network access.
//!
//! Answers come from an in-memory table, either built in code or loaded
//! from a JSON fixture file:
//!
//! ```json
//! [
//!   { "city": "Paris", "country": "France", "lat": 48.8566, "lon": 2.3522,
//!     "display_name": "Paris, Île-de-France, France" }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;

use super::error::GeocodeError;
use super::{Geocoder, PlaceQuery};
use crate::domain::{Coordinate, Place};

/// One entry in a fixture file.
#[derive(Debug, Deserialize)]
struct FixtureEntry {
    city: String,
    country: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder that serves places from a fixed table.
///
/// Lookups ignore language and match city and country case-insensitively.
/// Every call is counted, so tests can check what reached this layer.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: Arc<HashMap<String, Place>>,
    calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    /// Create an empty geocoder; every lookup fails with `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a place to the table.
    pub fn with_place(
        mut self,
        city: impl Into<String>,
        country: impl Into<String>,
        place: Place,
    ) -> Self {
        let key = Self::key(&city.into(), &country.into());
        Arc::make_mut(&mut self.places).insert(key, place);
        self
    }

    /// Load a JSON fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| GeocodeError::Cache {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Parse a JSON fixture.
    pub fn from_json(json: &str) -> Result<Self, GeocodeError> {
        let entries: Vec<FixtureEntry> =
            serde_json::from_str(json).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        let mut geocoder = Self::new();
        for entry in entries {
            let coordinate = Coordinate::new(entry.lat, entry.lon).map_err(|e| {
                GeocodeError::BadCoordinate {
                    query: format!("{}, {}", entry.city, entry.country),
                    message: e.to_string(),
                }
            })?;
            let display_name = entry
                .display_name
                .unwrap_or_else(|| format!("{}, {}", entry.city, entry.country));
            geocoder = geocoder.with_place(
                entry.city,
                entry.country,
                Place::new(coordinate, display_name),
            );
        }
        Ok(geocoder)
    }

    /// Number of lookups served so far, hits and misses alike.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Number of places in the table.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn key(city: &str, country: &str) -> String {
        format!(
            "{}|{}",
            city.trim().to_lowercase(),
            country.trim().to_lowercase()
        )
    }
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &PlaceQuery) -> Result<Place, GeocodeError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.places
            .get(&Self::key(&query.city, &query.country))
            .cloned()
            .ok_or_else(|| GeocodeError::NotFound {
                query: query.text(),
            })
    }
}
