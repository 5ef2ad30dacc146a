//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::document::{RouteDocument, VideoSettings};
use crate::domain::{Coordinate, Place, Resolution, Waypoint};
use crate::session::{AnimationSession, Frame, LabelView};
use crate::timeline::{EventKind, TimelineEvent};

/// A coordinate supplied by the caller instead of being geocoded.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinateInput {
    pub lat: f64,
    pub lon: f64,

    /// Label text; defaults to "city, country"
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Request to build a timeline.
///
/// The route document's fields sit at the top level, next to the
/// optional coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineRequest {
    #[serde(flatten)]
    pub document: RouteDocument,

    /// One per route stop, in order. Geocoded when absent.
    #[serde(default)]
    pub coordinates: Option<Vec<CoordinateInput>>,
}

/// Request to sample frames.
#[derive(Debug, Clone, Deserialize)]
pub struct FramesRequest {
    #[serde(flatten)]
    pub document: RouteDocument,

    #[serde(default)]
    pub coordinates: Option<Vec<CoordinateInput>>,

    /// Times to sample, in seconds. Every frame at the document's fps
    /// when absent.
    #[serde(default)]
    pub times: Option<Vec<f64>>,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointResult {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for PointResult {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.lat(),
            lon: c.lon(),
        }
    }
}

/// A schedule event.
///
/// Move events carry the leg fields; every other kind carries
/// `point_index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventResult {
    pub time: f64,

    /// One of `start`, `move`, `show_label`, `arrive`, `hide_label`
    pub kind: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl EventResult {
    pub fn from_event(event: &TimelineEvent) -> Self {
        let mut result = Self {
            time: event.time,
            kind: event.kind.name(),
            point_index: event.kind.point_index(),
            from_index: None,
            to_index: None,
            transport: None,
            duration: None,
        };
        if let EventKind::Move(leg) = &event.kind {
            result.from_index = Some(leg.from_index);
            result.to_index = Some(leg.to_index);
            result.transport = Some(leg.transport.as_str());
            result.duration = Some(leg.duration);
        }
        result
    }
}

/// A waypoint with its resolved position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointResult {
    pub city: String,
    pub country: String,

    /// How this waypoint is reached; absent for the first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<&'static str>,

    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub width: u32,
    pub height: u32,
}

impl From<Resolution> for ResolutionResult {
    fn from(r: Resolution) -> Self {
        Self {
            width: r.width,
            height: r.height,
        }
    }
}

/// Response from building a timeline.
///
/// Carries the render settings alongside the schedule so a renderer
/// needs nothing else from the request.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineResponse {
    pub total_duration: f64,
    pub leg_durations: Vec<f64>,
    pub events: Vec<EventResult>,
    pub waypoints: Vec<WaypointResult>,
    pub fps: u32,
    pub frame_count: usize,
    pub resolution: ResolutionResult,
    pub map_style: String,
}

impl TimelineResponse {
    /// `resolution` is the already-parsed `video.resolution`.
    pub fn from_session(
        session: &AnimationSession,
        video: &VideoSettings,
        resolution: Resolution,
    ) -> Self {
        let fps = video.fps();
        let schedule = session.schedule();
        let waypoints = session
            .route()
            .waypoints()
            .iter()
            .zip(session.places())
            .map(|(w, p)| waypoint_result(w, p))
            .collect();

        Self {
            total_duration: schedule.total_duration(),
            leg_durations: schedule.leg_durations().to_vec(),
            events: schedule.events().iter().map(EventResult::from_event).collect(),
            waypoints,
            fps,
            frame_count: session.frame_count(fps),
            resolution: resolution.into(),
            map_style: video.map_style().to_string(),
        }
    }
}

fn waypoint_result(waypoint: &Waypoint, place: &Place) -> WaypointResult {
    WaypointResult {
        city: waypoint.city.clone(),
        country: waypoint.country.clone(),
        transport: waypoint.transport.map(|t| t.as_str()),
        lat: place.coordinate.lat(),
        lon: place.coordinate.lon(),
        display_name: place.display_name.clone(),
    }
}

/// The label on screen in a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelResult {
    pub point_index: usize,
    pub city: String,
    pub country: String,
    pub display_name: String,
}

impl From<LabelView> for LabelResult {
    fn from(label: LabelView) -> Self {
        Self {
            point_index: label.point_index,
            city: label.city,
            country: label.country,
            display_name: label.display_name,
        }
    }
}

/// One sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameResult {
    pub time: f64,
    pub position: Option<PointResult>,
    pub camera: PointResult,
    pub zoom: f64,
    pub active_label: Option<LabelResult>,
    pub visited_legs: usize,
}

impl From<Frame> for FrameResult {
    fn from(frame: Frame) -> Self {
        Self {
            time: frame.time,
            position: frame.position.map(PointResult::from),
            camera: frame.camera.into(),
            zoom: frame.zoom,
            active_label: frame.active_label.map(LabelResult::from),
            visited_legs: frame.visited_legs,
        }
    }
}

/// Response from sampling frames.
#[derive(Debug, Clone, Serialize)]
pub struct FramesResponse {
    pub total_duration: f64,
    pub frames: Vec<FrameResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
