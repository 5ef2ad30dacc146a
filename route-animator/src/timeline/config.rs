//! Pacing configuration for the timeline engine.

use crate::domain::{EngineError, Transport};

/// Parameters controlling how animation time is spent.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingConfig {
    /// Time the camera dwells at each waypoint, including the start (seconds).
    pub hold_secs: f64,

    /// Shortest time any leg may take (seconds).
    /// Legs whose share falls below this are raised to it.
    pub min_leg_secs: f64,

    /// Longest time any leg may take (seconds).
    /// Legs above this are cut back and the excess is not reassigned.
    pub max_leg_secs: f64,

    /// How long before arrival a waypoint label appears (seconds).
    pub label_show_lead_secs: f64,

    /// How long before the end of a hold a waypoint label disappears (seconds).
    pub label_hide_lead_secs: f64,

    /// Transport for waypoints that don't name one.
    pub default_transport: Transport,
}

impl PacingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        hold_secs: f64,
        min_leg_secs: f64,
        max_leg_secs: f64,
        label_show_lead_secs: f64,
        label_hide_lead_secs: f64,
        default_transport: Transport,
    ) -> Self {
        Self {
            hold_secs,
            min_leg_secs,
            max_leg_secs,
            label_show_lead_secs,
            label_hide_lead_secs,
            default_transport,
        }
    }

    /// Returns a copy with a different hold time.
    pub fn with_hold_secs(mut self, hold_secs: f64) -> Self {
        self.hold_secs = hold_secs;
        self
    }

    /// Returns a copy with different leg bounds.
    pub fn with_leg_bounds(mut self, min_leg_secs: f64, max_leg_secs: f64) -> Self {
        self.min_leg_secs = min_leg_secs;
        self.max_leg_secs = max_leg_secs;
        self
    }

    /// Total dwell time for a route with `waypoints` stops.
    pub fn total_hold_secs(&self, waypoints: usize) -> f64 {
        self.hold_secs * waypoints as f64
    }

    /// Check that every field is finite, non-negative, and the leg bounds
    /// are ordered.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fields = [
            self.hold_secs,
            self.min_leg_secs,
            self.max_leg_secs,
            self.label_show_lead_secs,
            self.label_hide_lead_secs,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::InvalidPacing("all timings must be finite"));
        }
        if fields.iter().any(|v| *v < 0.0) {
            return Err(EngineError::InvalidPacing("timings cannot be negative"));
        }
        if self.min_leg_secs > self.max_leg_secs {
            return Err(EngineError::InvalidPacing(
                "min leg time exceeds max leg time",
            ));
        }
        Ok(())
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            hold_secs: 0.8,
            min_leg_secs: 1.2,
            max_leg_secs: 12.0,
            label_show_lead_secs: 0.3,
            label_hide_lead_secs: 0.25,
            default_transport: Transport::Plane,
        }
    }
}
