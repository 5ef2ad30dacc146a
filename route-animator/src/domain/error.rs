//! Engine error types.
//!
//! These errors represent configuration and route validation failures.
//! Everything downstream of a successful allocation is total.

use super::InvalidCoordinate;

/// Errors raised while validating a route or building its schedule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The requested duration cannot fit the holds and minimum leg times.
    ///
    /// `feasible_hold_secs` is the largest hold that still leaves every leg
    /// its minimum time, so callers can shrink `hold_sec` to it and retry.
    /// `max_hold_secs` is the hold that would consume the whole duration.
    #[error(
        "animation of {requested_secs}s is too short for {waypoints} waypoints holding \
         {hold_secs}s each: legs need at least {min_move_secs}s of travel, so hold at most \
         {feasible_hold_secs}s (max hold with no travel is {max_hold_secs}s)"
    )]
    DurationTooShort {
        requested_secs: f64,
        hold_secs: f64,
        waypoints: usize,
        max_hold_secs: f64,
        /// Largest hold that fits the minimum leg times; never negative.
        feasible_hold_secs: f64,
        /// Smallest move budget that satisfies the minimum leg time.
        min_move_secs: f64,
    },

    /// Route shape or transport modes are invalid
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// A coordinate is out of range
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    /// Pacing parameters are inconsistent
    #[error("invalid pacing: {0}")]
    InvalidPacing(&'static str),

    /// Resolved places don't line up with waypoints
    #[error("route has {waypoints} waypoints but {coordinates} coordinates")]
    CoordinateCountMismatch {
        waypoints: usize,
        coordinates: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::DurationTooShort {
            requested_secs: 3.0,
            hold_secs: 0.8,
            waypoints: 3,
            max_hold_secs: 1.0,
            feasible_hold_secs: 0.2,
            min_move_secs: 2.4,
        };
        assert_eq!(
            err.to_string(),
            "animation of 3s is too short for 3 waypoints holding 0.8s each: legs need at \
             least 2.4s of travel, so hold at most 0.2s (max hold with no travel is 1s)"
        );

        let err = EngineError::InvalidRoute("route needs at least 2 waypoints".into());
        assert_eq!(
            err.to_string(),
            "invalid route: route needs at least 2 waypoints"
        );

        let err = EngineError::InvalidPacing("min leg time exceeds max leg time");
        assert_eq!(
            err.to_string(),
            "invalid pacing: min leg time exceeds max leg time"
        );

        let err = EngineError::CoordinateCountMismatch {
            waypoints: 3,
            coordinates: 2,
        };
        assert_eq!(err.to_string(), "route has 3 waypoints but 2 coordinates");
    }
}
