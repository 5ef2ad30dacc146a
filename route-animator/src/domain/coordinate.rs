//! Geographic coordinate types.

use std::fmt;

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A latitude/longitude pair in degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
/// This type guarantees that by construction.
///
/// # Examples
///
/// ```
/// use route_animator::domain::Coordinate;
///
/// let paris = Coordinate::new(48.8566, 2.3522).unwrap();
/// assert_eq!(paris.lat(), 48.8566);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                reason: "latitude and longitude must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Build a coordinate from computed degrees, clamping latitude and
    /// wrapping longitude back into range.
    pub(crate) fn normalized(lat: f64, lon: f64) -> Self {
        let lat = lat.clamp(-90.0, 90.0);
        let lon = if (-180.0..=180.0).contains(&lon) {
            lon
        } else {
            (lon + 180.0).rem_euclid(360.0) - 180.0
        };
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// A resolved place: where a waypoint is, and how to label it.
///
/// `display_name` comes from the lookup service and is passed through
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coordinate: Coordinate,
    pub display_name: String,
}

impl Place {
    /// Creates a new place.
    pub fn new(coordinate: Coordinate, display_name: impl Into<String>) -> Self {
        Self {
            coordinate,
            display_name: display_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(-90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn normalized_wraps_longitude() {
        let c = Coordinate::normalized(10.0, 190.0);
        assert!((c.lon() - -170.0).abs() < 1e-9);

        let c = Coordinate::normalized(10.0, -200.0);
        assert!((c.lon() - 160.0).abs() < 1e-9);

        let c = Coordinate::normalized(90.000_000_001, 45.0);
        assert_eq!(c.lat(), 90.0);
        assert_eq!(c.lon(), 45.0);
    }

    #[test]
    fn display_format() {
        let c = Coordinate::new(51.5074, -0.1278).unwrap();
        assert_eq!(c.to_string(), "51.50740, -0.12780");
    }
}
