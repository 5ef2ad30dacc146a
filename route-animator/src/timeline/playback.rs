//! Playback state reconstruction.
//!
//! Given a query time, replay the schedule's events up to that instant to
//! find which leg is active and which label is showing.

use super::schedule::{EventKind, LegMove, Schedule};

/// The most recent leg to have started, and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveLeg {
    /// Time the move began (seconds from animation start).
    pub start_time: f64,
    pub leg: LegMove,
}

impl ActiveLeg {
    /// Time the move ends.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.leg.duration
    }

    /// Returns true if `time` falls within the move, endpoints included.
    pub fn is_moving_at(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time()
    }
}

/// What's on screen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub active_leg: Option<ActiveLeg>,
    /// Waypoint whose label is visible.
    pub active_label: Option<usize>,
}

/// Reconstruct the playback state at `time`.
///
/// Replays events with `event.time <= time` in order. A `HideLabel` only
/// clears the label it names, so a stale hide can't blank a newer label.
/// Times before the first event give an empty state; times past the end
/// keep the final leg.
///
/// # Examples
///
/// ```
/// use route_animator::domain::{Route, Transport, Waypoint};
/// use route_animator::timeline::{PacingConfig, Schedule, resolve};
///
/// let route = Route::new(
///     vec![Waypoint::new("Oslo", "Norway"), Waypoint::new("Bergen", "Norway")],
///     Transport::Train,
/// )
/// .unwrap();
/// let schedule = Schedule::build(&route, vec![4.0], &PacingConfig::default()).unwrap();
///
/// assert!(resolve(&schedule, 0.5).active_leg.is_none());
/// assert!(resolve(&schedule, 1.0).active_leg.is_some());
/// assert_eq!(resolve(&schedule, 4.7).active_label, Some(1));
/// ```
pub fn resolve(schedule: &Schedule, time: f64) -> PlaybackState {
    let mut state = PlaybackState::default();

    for event in schedule.events().iter().take_while(|e| e.time <= time) {
        match event.kind {
            EventKind::Move(leg) => {
                state.active_leg = Some(ActiveLeg {
                    start_time: event.time,
                    leg,
                });
            }
            EventKind::ShowLabel { point_index } => {
                state.active_label = Some(point_index);
            }
            EventKind::HideLabel { point_index } => {
                if state.active_label == Some(point_index) {
                    state.active_label = None;
                }
            }
            EventKind::Start { .. } | EventKind::Arrive { .. } => {}
        }
    }

    state
}
