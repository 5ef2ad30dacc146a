//! Place lookup.
//!
//! Route documents name cities; the timeline needs coordinates. This
//! module turns one into the other:
//!
//! - [`NominatimClient`] asks a Nominatim-compatible search service
//! - [`GeocodeCache`] keeps answers on disk between runs
//! - [`CachedGeocoder`] layers an in-memory memo and the disk cache over
//!   any other geocoder
//! - [`StaticGeocoder`] answers from a fixed table, for tests and offline
//!   use
//!
//! Display names are passed through exactly as the service returns them.

mod cache;
mod client;
mod error;
mod memo;
mod mock;

use tracing::debug;

use crate::domain::{Place, Route};

pub use cache::{GeocodeCache, GeocodeCacheConfig};
pub use client::{GeocoderConfig, NominatimClient};
pub use error::GeocodeError;
pub use memo::{CachedGeocoder, MemoConfig};
pub use mock::StaticGeocoder;

/// What to look up: a city, its country, and the language for the
/// display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceQuery {
    pub city: String,
    pub country: String,
    pub language: String,
}

impl PlaceQuery {
    /// Creates a new query.
    pub fn new(
        city: impl Into<String>,
        country: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            language: language.into(),
        }
    }

    /// Free-text search string, e.g. `"Paris, France"`.
    pub fn text(&self) -> String {
        format!("{}, {}", self.city.trim(), self.country.trim())
    }

    /// Normalized key for caches: lowercased, trimmed, `|`-separated.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_animator::geocode::PlaceQuery;
    ///
    /// let q = PlaceQuery::new(" Paris ", "FRANCE", "en");
    /// assert_eq!(q.cache_key(), "paris|france|en");
    /// ```
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.city.trim().to_lowercase(),
            self.country.trim().to_lowercase(),
            self.language.trim().to_lowercase()
        )
    }
}

/// Trait for resolving place names.
///
/// This abstraction allows route resolution to be tested with fixed data.
pub trait Geocoder: Send + Sync {
    /// Look up a single place.
    fn geocode(
        &self,
        query: &PlaceQuery,
    ) -> impl Future<Output = Result<Place, GeocodeError>> + Send;
}

/// Resolve every waypoint of `route`, in order.
///
/// Lookups run one at a time; public geocoding services rate-limit
/// aggressively and most answers come from cache anyway.
///
/// # Errors
///
/// Returns the first lookup failure.
pub async fn resolve_route<G: Geocoder>(
    geocoder: &G,
    route: &Route,
    language: &str,
) -> Result<Vec<Place>, GeocodeError> {
    let mut places = Vec::with_capacity(route.len());

    for waypoint in route.waypoints() {
        let query = PlaceQuery::new(&waypoint.city, &waypoint.country, language);
        let place = geocoder.geocode(&query).await?;
        debug!(
            city = %waypoint.city,
            country = %waypoint.country,
            coordinate = %place.coordinate,
            "Resolved waypoint"
        );
        places.push(place);
    }

    Ok(places)
}
