//! Distance and interpolation over a spherical Earth.

use crate::domain::{Coordinate, Transport};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Below this, `sin` of the central angle is treated as zero (coincident or
/// antipodal endpoints) and the great circle is not unique.
const DEGENERATE_ARC: f64 = 1e-12;

/// Great-circle distance in kilometres using the haversine formula.
///
/// Symmetric, never negative, and zero for identical coordinates.
///
/// # Examples
///
/// ```
/// use route_animator::domain::Coordinate;
/// use route_animator::geodesy::distance_km;
///
/// let london = Coordinate::new(51.5074, -0.1278).unwrap();
/// let paris = Coordinate::new(48.8566, 2.3522).unwrap();
///
/// let d = distance_km(london, paris);
/// assert!((d - 343.5).abs() < 1.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}

/// Angle subtended at the Earth's centre, in radians.
fn central_angle(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lat = (b.lat() - a.lat()).to_radians();
    let delta_lon = (b.lon() - a.lon()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * h.sqrt().min(1.0).asin()
}

/// Position a fraction `t` of the way from `a` to `b`.
///
/// Planes follow the great circle; trains and cars move in a straight line
/// across latitude and longitude. `t` is clamped to [0, 1] and the
/// endpoints are returned exactly at 0 and 1.
pub fn interpolate(a: Coordinate, b: Coordinate, t: f64, mode: Transport) -> Coordinate {
    if t <= 0.0 || a == b {
        return a;
    }
    if t >= 1.0 {
        return b;
    }

    if mode.is_airborne() {
        great_circle(a, b, t)
    } else {
        linear(a, b, t)
    }
}

/// Spherical interpolation by angular fraction along the shorter arc.
fn great_circle(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    let delta = central_angle(a, b);
    let sin_delta = delta.sin();
    if sin_delta.abs() < DEGENERATE_ARC {
        return linear(a, b, t);
    }

    let (lat1, lon1) = (a.lat().to_radians(), a.lon().to_radians());
    let (lat2, lon2) = (b.lat().to_radians(), b.lon().to_radians());

    let wa = ((1.0 - t) * delta).sin() / sin_delta;
    let wb = (t * delta).sin() / sin_delta;

    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);

    Coordinate::normalized(lat.to_degrees(), lon.to_degrees())
}

fn linear(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    Coordinate::normalized(
        a.lat() + (b.lat() - a.lat()) * t,
        a.lon() + (b.lon() - a.lon()) * t,
    )
}
