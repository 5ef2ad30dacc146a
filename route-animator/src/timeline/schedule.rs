//! Timeline events and schedule construction.
//!
//! A `Schedule` is the time-sorted list of discrete events for one route.
//! It is built once and never mutated; a new route means a new schedule.

use std::cmp::Ordering;

use tracing::debug;

use super::config::PacingConfig;
use crate::domain::{EngineError, Route, Transport};

/// The travel half of a leg: which waypoints, how, and for how long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegMove {
    pub from_index: usize,
    pub to_index: usize,
    pub transport: Transport,
    /// Travel time in seconds.
    pub duration: f64,
}

/// What happens at a point on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Camera settles on the first waypoint
    Start { point_index: usize },
    /// Travel along a leg begins
    Move(LegMove),
    /// A waypoint label becomes visible
    ShowLabel { point_index: usize },
    /// Travel along a leg ends at its destination
    Arrive { point_index: usize },
    /// A waypoint label is hidden
    HideLabel { point_index: usize },
}

impl EventKind {
    /// Tie-break rank for events sharing a timestamp.
    ///
    /// Arrivals close a leg before anything else happens at that instant,
    /// an outgoing label is hidden before the next one is shown, and a new
    /// move starts last.
    fn priority(&self) -> u8 {
        match self {
            EventKind::Start { .. } => 0,
            EventKind::Arrive { .. } => 1,
            EventKind::HideLabel { .. } => 2,
            EventKind::ShowLabel { .. } => 3,
            EventKind::Move(_) => 4,
        }
    }

    /// Returns a short name for this event type.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Start { .. } => "start",
            EventKind::Move(_) => "move",
            EventKind::ShowLabel { .. } => "show_label",
            EventKind::Arrive { .. } => "arrive",
            EventKind::HideLabel { .. } => "hide_label",
        }
    }

    /// Returns the waypoint this event refers to, for non-move events.
    pub fn point_index(&self) -> Option<usize> {
        match self {
            EventKind::Start { point_index }
            | EventKind::ShowLabel { point_index }
            | EventKind::Arrive { point_index }
            | EventKind::HideLabel { point_index } => Some(*point_index),
            EventKind::Move(_) => None,
        }
    }
}

/// A single event at an absolute time (seconds from animation start).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineEvent {
    pub time: f64,
    pub kind: EventKind,
}

impl TimelineEvent {
    fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }

    /// Returns the move payload if this is a `Move` event.
    pub fn as_move(&self) -> Option<&LegMove> {
        match &self.kind {
            EventKind::Move(leg) => Some(leg),
            _ => None,
        }
    }
}

/// Order by time, then by event priority.
fn event_order(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
    a.time
        .total_cmp(&b.time)
        .then_with(|| a.kind.priority().cmp(&b.kind.priority()))
}

/// The complete, time-sorted event list for one route.
///
/// # Invariants
///
/// - Events are sorted by `(time, priority)`
/// - `leg_durations.len()` equals the route's leg count
/// - `total_duration` is the running clock after the last hold, i.e.
///   the sum of all leg durations plus one hold per waypoint
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    events: Vec<TimelineEvent>,
    total_duration: f64,
    leg_durations: Vec<f64>,
}

impl Schedule {
    /// Build the schedule for a route from its allocated leg durations.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRoute` if `leg_durations` doesn't have one entry per
    /// leg, or `InvalidPacing` if a duration is negative or non-finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_animator::domain::{Route, Transport, Waypoint};
    /// use route_animator::timeline::{PacingConfig, Schedule};
    ///
    /// let route = Route::new(
    ///     vec![Waypoint::new("Rome", "Italy"), Waypoint::new("Milan", "Italy")],
    ///     Transport::Train,
    /// )
    /// .unwrap();
    ///
    /// let schedule = Schedule::build(&route, vec![5.0], &PacingConfig::default()).unwrap();
    /// assert_eq!(schedule.events().len(), 5);
    /// assert!((schedule.total_duration() - 6.6).abs() < 1e-9);
    /// ```
    pub fn build(
        route: &Route,
        leg_durations: Vec<f64>,
        pacing: &PacingConfig,
    ) -> Result<Self, EngineError> {
        if leg_durations.len() != route.leg_count() {
            return Err(EngineError::InvalidRoute(format!(
                "expected {} leg durations, got {}",
                route.leg_count(),
                leg_durations.len()
            )));
        }
        if leg_durations.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(EngineError::InvalidPacing(
                "leg durations must be finite and non-negative",
            ));
        }

        let hold = pacing.hold_secs;
        let mut events = Vec::with_capacity(1 + 4 * leg_durations.len());
        events.push(TimelineEvent::new(0.0, EventKind::Start { point_index: 0 }));

        let mut clock = hold;
        for (i, &duration) in leg_durations.iter().enumerate() {
            let transport = route
                .leg_transport(i)
                .unwrap_or(pacing.default_transport);
            let to_index = i + 1;

            events.push(TimelineEvent::new(
                clock,
                EventKind::Move(LegMove {
                    from_index: i,
                    to_index,
                    transport,
                    duration,
                }),
            ));
            events.push(TimelineEvent::new(
                clock + duration - pacing.label_show_lead_secs,
                EventKind::ShowLabel {
                    point_index: to_index,
                },
            ));
            clock += duration;
            events.push(TimelineEvent::new(
                clock,
                EventKind::Arrive {
                    point_index: to_index,
                },
            ));
            events.push(TimelineEvent::new(
                clock + hold - pacing.label_hide_lead_secs,
                EventKind::HideLabel {
                    point_index: to_index,
                },
            ));
            clock += hold;
        }

        events.sort_by(event_order);

        debug!(
            events = events.len(),
            legs = leg_durations.len(),
            total_duration = clock,
            "Built schedule"
        );

        Ok(Schedule {
            events,
            total_duration: clock,
            leg_durations,
        })
    }

    /// Returns all events in time order.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Measured length of the animation in seconds.
    ///
    /// This can be shorter than the requested duration when legs were cut
    /// to the maximum leg time; use it for the video length.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Returns the allocated duration of each leg, in route order.
    pub fn leg_durations(&self) -> &[f64] {
        &self.leg_durations
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.leg_durations.len()
    }

    /// Returns the move events in time order.
    pub fn moves(&self) -> impl Iterator<Item = (f64, &LegMove)> {
        self.events
            .iter()
            .filter_map(|e| e.as_move().map(|leg| (e.time, leg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Waypoint;

    fn route(n: usize) -> Route {
        let waypoints = (0..n)
            .map(|i| {
                let w = Waypoint::new(format!("City {i}"), "Country");
                if i == 2 { w.by(Transport::Car) } else { w }
            })
            .collect();
        Route::new(waypoints, Transport::Plane).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn single_leg_event_sequence() {
        let pacing = PacingConfig::default();
        let schedule = Schedule::build(&route(2), vec![4.0], &pacing).unwrap();

        let kinds: Vec<_> = schedule.events().iter().map(|e| e.kind.name()).collect();
        assert_eq!(
            kinds,
            vec!["start", "move", "show_label", "arrive", "hide_label"]
        );

        let times: Vec<_> = schedule.events().iter().map(|e| e.time).collect();
        assert_close(times[0], 0.0);
        assert_close(times[1], 0.8);
        assert_close(times[2], 0.8 + 4.0 - 0.3);
        assert_close(times[3], 4.8);
        assert_close(times[4], 4.8 + 0.8 - 0.25);
        assert_close(schedule.total_duration(), 5.6);
    }

    #[test]
    fn move_payload_and_transport() {
        let pacing = PacingConfig::default();
        let schedule = Schedule::build(&route(3), vec![3.0, 2.0], &pacing).unwrap();

        let moves: Vec<_> = schedule.moves().collect();
        assert_eq!(moves.len(), 2);

        let (start, first) = moves[0];
        assert_close(start, 0.8);
        assert_eq!(first.from_index, 0);
        assert_eq!(first.to_index, 1);
        assert_eq!(first.transport, Transport::Plane);
        assert_eq!(first.duration, 3.0);

        let (start, second) = moves[1];
        assert_close(start, 0.8 + 3.0 + 0.8);
        assert_eq!(second.from_index, 1);
        assert_eq!(second.to_index, 2);
        assert_eq!(second.transport, Transport::Car);
    }

    #[test]
    fn total_is_legs_plus_holds() {
        let pacing = PacingConfig::default();
        let legs = vec![12.0, 12.0];
        let schedule = Schedule::build(&route(3), legs, &pacing).unwrap();

        assert_close(schedule.total_duration(), 24.0 + 3.0 * 0.8);
        assert_eq!(schedule.leg_durations(), &[12.0, 12.0]);
        assert_eq!(schedule.leg_count(), 2);
    }

    #[test]
    fn equal_times_follow_priority() {
        // No hold and no label leads: arrive, hide, show and the next move
        // all collapse onto shared instants.
        let pacing = PacingConfig::new(0.0, 0.0, 10.0, 0.0, 0.0, Transport::Plane);
        let schedule = Schedule::build(&route(3), vec![2.0, 2.0], &pacing).unwrap();

        let at_two: Vec<_> = schedule
            .events()
            .iter()
            .filter(|e| e.time == 2.0)
            .map(|e| e.kind.name())
            .collect();
        assert_eq!(at_two, vec!["arrive", "hide_label", "show_label", "move"]);

        let at_zero: Vec<_> = schedule
            .events()
            .iter()
            .filter(|e| e.time == 0.0)
            .map(|e| e.kind.name())
            .collect();
        assert_eq!(at_zero, vec!["start", "move"]);
    }

    #[test]
    fn short_leg_shows_label_before_move() {
        let pacing = PacingConfig::default();
        let schedule = Schedule::build(&route(2), vec![0.1], &pacing).unwrap();

        let kinds: Vec<_> = schedule.events().iter().map(|e| e.kind.name()).collect();
        assert_eq!(
            kinds,
            vec!["start", "show_label", "move", "arrive", "hide_label"]
        );
    }

    #[test]
    fn rejects_mismatched_durations() {
        let pacing = PacingConfig::default();
        let result = Schedule::build(&route(3), vec![1.0], &pacing);
        assert!(matches!(result, Err(EngineError::InvalidRoute(_))));

        let result = Schedule::build(&route(2), vec![-1.0], &pacing);
        assert!(matches!(result, Err(EngineError::InvalidPacing(_))));
    }

    #[test]
    fn event_accessors() {
        let event = TimelineEvent::new(1.0, EventKind::Arrive { point_index: 3 });
        assert_eq!(event.kind.point_index(), Some(3));
        assert!(event.as_move().is_none());
    }
}
