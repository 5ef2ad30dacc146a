//! Camera motion along the active leg.

use super::playback::ActiveLeg;
use crate::domain::Coordinate;
use crate::geodesy::{distance_km, interpolate};

/// Closest the camera zooms out.
pub const MIN_ZOOM: f64 = 2.0;

/// Furthest the camera zooms in.
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom for a zero-length leg, before clamping.
const BASE_ZOOM: f64 = 4.0;

/// Zoom lost per kilometre of leg length.
const ZOOM_PER_KM: f64 = 0.3;

/// Cubic ease-in-out over [0, 1].
///
/// Returns exactly 0 at 0 and exactly 1 at 1; input is clamped.
pub fn ease_in_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// Position on the active leg at `time`.
///
/// Returns `None` if there is no active leg, if `time` lies outside the
/// move, or if the leg's endpoints aren't in `coordinates`.
///
/// # Examples
///
/// ```
/// use route_animator::domain::{Coordinate, Transport};
/// use route_animator::timeline::{ActiveLeg, LegMove, sample_position};
///
/// let coords = [
///     Coordinate::new(0.0, 0.0).unwrap(),
///     Coordinate::new(0.0, 10.0).unwrap(),
/// ];
/// let active = ActiveLeg {
///     start_time: 1.0,
///     leg: LegMove { from_index: 0, to_index: 1, transport: Transport::Car, duration: 2.0 },
/// };
///
/// assert_eq!(sample_position(Some(&active), &coords, 1.0), Some(coords[0]));
/// assert_eq!(sample_position(Some(&active), &coords, 3.0), Some(coords[1]));
/// assert_eq!(sample_position(Some(&active), &coords, 3.5), None);
/// ```
pub fn sample_position(
    active: Option<&ActiveLeg>,
    coordinates: &[Coordinate],
    time: f64,
) -> Option<Coordinate> {
    let active = active?;
    if !active.is_moving_at(time) {
        return None;
    }

    let from = *coordinates.get(active.leg.from_index)?;
    let to = *coordinates.get(active.leg.to_index)?;

    let progress = if time >= active.end_time() || active.leg.duration <= 0.0 {
        1.0
    } else {
        (time - active.start_time) / active.leg.duration
    };

    Some(interpolate(
        from,
        to,
        ease_in_out_cubic(progress),
        active.leg.transport,
    ))
}

/// Camera zoom for a leg between `from` and `to`.
///
/// Longer legs zoom out; the result is always within
/// [`MIN_ZOOM`, `MAX_ZOOM`].
pub fn derive_zoom(from: Coordinate, to: Coordinate) -> f64 {
    (BASE_ZOOM - distance_km(from, to) * ZOOM_PER_KM).clamp(MIN_ZOOM, MAX_ZOOM)
}
