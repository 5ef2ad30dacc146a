//! Nominatim search API client.

use serde::Deserialize;
use tracing::debug;

use super::error::GeocodeError;
use super::{Geocoder, PlaceQuery};
use crate::domain::{Coordinate, Place};

/// Default base URL for the public OpenStreetMap Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = concat!("route-animator/", env!("CARGO_PKG_VERSION"));

/// A single search hit. Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service
    pub base_url: String,
    /// Sent as the `User-Agent` header
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Create a config pointing at the public Nominatim instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (self-hosted instance, or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a new client.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search for a place, returning the best match.
    pub async fn search(&self, query: &PlaceQuery) -> Result<Place, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let text = query.text();

        debug!(query = %text, language = %query.language, "Geocoding");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", text.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("accept-language", query.language.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_search_response(&body, &text)
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &PlaceQuery) -> Result<Place, GeocodeError> {
        self.search(query).await
    }
}

/// Turn a `/search?format=json` body into the first matching place.
fn parse_search_response(body: &str, query: &str) -> Result<Place, GeocodeError> {
    let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(|e| GeocodeError::Json {
        message: e.to_string(),
    })?;

    let hit = hits.into_iter().next().ok_or_else(|| GeocodeError::NotFound {
        query: query.to_string(),
    })?;

    let bad_coordinate = |message: String| GeocodeError::BadCoordinate {
        query: query.to_string(),
        message,
    };
    let lat: f64 = hit
        .lat
        .parse()
        .map_err(|_| bad_coordinate(format!("latitude '{}' is not a number", hit.lat)))?;
    let lon: f64 = hit
        .lon
        .parse()
        .map_err(|_| bad_coordinate(format!("longitude '{}' is not a number", hit.lon)))?;
    let coordinate = Coordinate::new(lat, lon).map_err(|e| bad_coordinate(e.to_string()))?;

    Ok(Place::new(coordinate, hit.display_name))
}
