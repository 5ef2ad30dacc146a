//! Geocoding error types.

/// Errors from resolving a place name to a coordinate.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The lookup service had no match
    #[error("no match for '{query}'")]
    NotFound { query: String },

    /// The lookup service returned an error status
    #[error("geocoder error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The service returned a coordinate outside the valid range
    #[error("bad coordinate for '{query}': {message}")]
    BadCoordinate { query: String, message: String },

    /// Reading or writing the disk cache failed
    #[error("cache error: {message}")]
    Cache { message: String },
}
