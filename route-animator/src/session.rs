//! Animation sessions and per-frame sampling.
//!
//! An [`AnimationSession`] bundles a validated route, its resolved places,
//! and the schedule built from them. It is immutable once built; every
//! query takes `&self`, so a session can be shared between request
//! handlers or render threads.

use tracing::info;

use crate::domain::{Coordinate, EngineError, Place, Route};
use crate::geodesy::distance_km;
use crate::timeline::{
    PacingConfig, Schedule, allocate_leg_durations, derive_zoom, resolve, sample_position,
};

/// Slack for rounding in the summed schedule clock when counting frames.
const FRAME_TOLERANCE: f64 = 1e-6;

/// The label currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelView {
    pub point_index: usize,
    pub city: String,
    pub country: String,
    pub display_name: String,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Seconds from animation start.
    pub time: f64,
    /// Travelling marker; `None` outside a move.
    pub position: Option<Coordinate>,
    /// Where the camera is centred. Always set.
    pub camera: Coordinate,
    pub zoom: f64,
    pub active_label: Option<LabelView>,
    /// Number of legs fully travelled, for the visited-route overlay.
    pub visited_legs: usize,
}

/// A route ready to be played back.
///
/// # Invariants
///
/// - `places.len()` equals the route's waypoint count (at least two)
/// - `schedule` was built from this route and these places
#[derive(Debug, Clone)]
pub struct AnimationSession {
    route: Route,
    places: Vec<Place>,
    coordinates: Vec<Coordinate>,
    schedule: Schedule,
}

impl AnimationSession {
    /// Measure the legs, allocate time and build the schedule.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateCountMismatch` if there isn't exactly one place
    /// per waypoint, and any allocation error (`DurationTooShort`,
    /// `InvalidPacing`).
    pub fn new(
        route: Route,
        places: Vec<Place>,
        pacing: &PacingConfig,
        total_secs: f64,
    ) -> Result<Self, EngineError> {
        if places.len() != route.len() {
            return Err(EngineError::CoordinateCountMismatch {
                waypoints: route.len(),
                coordinates: places.len(),
            });
        }

        let coordinates: Vec<Coordinate> = places.iter().map(|p| p.coordinate).collect();
        let distances: Vec<f64> = coordinates
            .windows(2)
            .map(|pair| distance_km(pair[0], pair[1]))
            .collect();

        let leg_durations = allocate_leg_durations(&distances, total_secs, pacing)?;
        let schedule = Schedule::build(&route, leg_durations, pacing)?;

        info!(
            waypoints = route.len(),
            requested_secs = total_secs,
            total_duration = schedule.total_duration(),
            "Built animation session"
        );

        Ok(Self {
            route,
            places,
            coordinates,
            schedule,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Waypoint coordinates in route order.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Length of the animation in seconds, as scheduled.
    pub fn total_duration(&self) -> f64 {
        self.schedule.total_duration()
    }

    /// Sample the animation at `time`.
    pub fn frame_at(&self, time: f64) -> Frame {
        let state = resolve(&self.schedule, time);
        let active = state.active_leg.as_ref();
        let position = sample_position(active, &self.coordinates, time);

        // Route validation guarantees at least two waypoints
        let start = self.coordinates[0];

        let camera = match (position, active) {
            (Some(p), _) => p,
            (None, Some(a)) => self
                .coordinates
                .get(a.leg.to_index)
                .copied()
                .unwrap_or(start),
            (None, None) => start,
        };

        let (from, to) = match active {
            Some(a) => (a.leg.from_index, a.leg.to_index),
            None => (0, 1),
        };
        let zoom = match (self.coordinates.get(from), self.coordinates.get(to)) {
            (Some(&a), Some(&b)) => derive_zoom(a, b),
            _ => derive_zoom(start, start),
        };

        let visited_legs = match active {
            Some(a) if time >= a.end_time() => a.leg.to_index,
            Some(a) => a.leg.from_index,
            None => 0,
        };

        let active_label = state.active_label.and_then(|i| self.label(i));

        Frame {
            time,
            position,
            camera,
            zoom,
            active_label,
            visited_legs,
        }
    }

    /// Number of frames needed to cover the whole animation at `fps`.
    pub fn frame_count(&self, fps: u32) -> usize {
        if fps == 0 {
            return 0;
        }
        let frames = self.total_duration() * f64::from(fps) - FRAME_TOLERANCE;
        frames.max(0.0).ceil() as usize
    }

    /// Timestamps of each frame at `fps`, starting at zero.
    pub fn frame_times(&self, fps: u32) -> impl Iterator<Item = f64> {
        let count = self.frame_count(fps);
        let step = f64::from(fps);
        (0..count).map(move |i| i as f64 / step)
    }

    /// Every frame of the animation at `fps`.
    pub fn frames(&self, fps: u32) -> impl Iterator<Item = Frame> + '_ {
        self.frame_times(fps).map(|t| self.frame_at(t))
    }

    fn label(&self, point_index: usize) -> Option<LabelView> {
        let waypoint = self.route.waypoint(point_index)?;
        let place = self.places.get(point_index)?;
        Some(LabelView {
            point_index,
            city: waypoint.city.clone(),
            country: waypoint.country.clone(),
            display_name: place.display_name.clone(),
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Transport, Waypoint};
    use proptest::prelude::*;

    fn stops() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((-70.0f64..70.0, -170.0f64..170.0), 2..6)
    }

    fn build(stops: &[(f64, f64)], total: f64) -> Option<AnimationSession> {
        let waypoints = (0..stops.len())
            .map(|i| Waypoint::new(format!("City {i}"), "Country"))
            .collect();
        let route = Route::new(waypoints, Transport::Car).ok()?;
        let places = stops
            .iter()
            .map(|&(lat, lon)| Place::new(Coordinate::new(lat, lon).unwrap(), "Somewhere"))
            .collect();
        AnimationSession::new(route, places, &PacingConfig::default(), total).ok()
    }

    proptest! {
        /// Property: the camera follows the marker whenever there is one.
        #[test]
        fn camera_tracks_position(stops in stops(), total in 10.0f64..90.0, t in 0.0f64..100.0) {
            if let Some(session) = build(&stops, total) {
                let frame = session.frame_at(t);
                if let Some(p) = frame.position {
                    prop_assert_eq!(frame.camera, p);
                }
                prop_assert!(frame.visited_legs <= session.route().leg_count());
            }
        }

        /// Property: visited legs never decrease as time advances.
        #[test]
        fn visited_legs_monotone(stops in stops(), total in 10.0f64..90.0, a in 0.0f64..100.0, b in 0.0f64..100.0) {
            if let Some(session) = build(&stops, total) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(session.frame_at(lo).visited_legs <= session.frame_at(hi).visited_legs);
            }
        }
    }
}
