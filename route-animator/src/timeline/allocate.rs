//! Leg duration allocation.
//!
//! Splits the time left after holds across legs in proportion to their
//! distance, then enforces the per-leg pacing bounds:
//!
//! 1. Proportional share of the move budget
//! 2. Legs below the minimum are raised to it
//! 3. Any leftover budget goes to the unraised legs, weighted by their
//!    original shares
//! 4. Legs above the maximum are cut back; the excess is dropped
//!
//! Step 4 means the allocated total can fall short of the budget. The
//! schedule measures its own total, so callers should use that.

use tracing::debug;

use super::config::PacingConfig;
use crate::domain::EngineError;

/// Slack when comparing the move budget against the minimum leg times, so
/// a hold recomputed from `feasible_hold_secs` isn't rejected by rounding.
const BUDGET_TOLERANCE: f64 = 1e-9;

/// Allocate a duration in seconds to each leg.
///
/// `distances_km` holds one entry per leg, in route order. The result has
/// the same length.
///
/// # Errors
///
/// Returns `DurationTooShort` if the holds leave no time for travel, or
/// too little to give every leg its minimum time. Returns `InvalidPacing`
/// or `InvalidRoute` for malformed inputs.
///
/// # Examples
///
/// ```
/// use route_animator::timeline::{PacingConfig, allocate_leg_durations};
///
/// let pacing = PacingConfig::default().with_leg_bounds(1.0, 60.0);
/// let legs = allocate_leg_durations(&[300.0, 100.0], 12.4, &pacing).unwrap();
///
/// // 12.4s minus three 0.8s holds leaves 10s, split 3:1
/// assert!((legs[0] - 7.5).abs() < 1e-9);
/// assert!((legs[1] - 2.5).abs() < 1e-9);
/// ```
pub fn allocate_leg_durations(
    distances_km: &[f64],
    total_secs: f64,
    pacing: &PacingConfig,
) -> Result<Vec<f64>, EngineError> {
    pacing.validate()?;

    if !total_secs.is_finite() || total_secs <= 0.0 {
        return Err(EngineError::InvalidPacing(
            "total duration must be positive",
        ));
    }
    if distances_km.is_empty() {
        return Err(EngineError::InvalidRoute(
            "route needs at least one leg".to_string(),
        ));
    }
    if distances_km.iter().any(|d| !d.is_finite() || *d < 0.0) {
        return Err(EngineError::InvalidRoute(
            "leg distances must be finite and non-negative".to_string(),
        ));
    }

    let legs = distances_km.len();
    let waypoints = legs + 1;
    let move_budget = total_secs - pacing.total_hold_secs(waypoints);
    let min_move_secs = pacing.min_leg_secs * legs as f64;

    if move_budget <= 0.0 || move_budget < min_move_secs - BUDGET_TOLERANCE {
        return Err(EngineError::DurationTooShort {
            requested_secs: total_secs,
            hold_secs: pacing.hold_secs,
            waypoints,
            max_hold_secs: total_secs / waypoints as f64,
            feasible_hold_secs: ((total_secs - min_move_secs) / waypoints as f64).max(0.0),
            min_move_secs,
        });
    }

    let total_distance: f64 = distances_km.iter().sum();
    let raw: Vec<f64> = if total_distance > 0.0 {
        distances_km
            .iter()
            .map(|d| d / total_distance * move_budget)
            .collect()
    } else {
        vec![0.0; legs]
    };

    let clamped_low: Vec<bool> = raw.iter().map(|r| *r < pacing.min_leg_secs).collect();
    let mut durations: Vec<f64> = raw
        .iter()
        .zip(&clamped_low)
        .map(|(r, low)| if *low { pacing.min_leg_secs } else { *r })
        .collect();

    let remaining = move_budget - durations.iter().sum::<f64>();
    let free_weight: f64 = raw
        .iter()
        .zip(&clamped_low)
        .filter(|(_, low)| !**low)
        .map(|(r, _)| r)
        .sum();

    if remaining > 0.0 && free_weight > 0.0 {
        for ((duration, r), low) in durations.iter_mut().zip(&raw).zip(&clamped_low) {
            if !low {
                *duration += remaining * r / free_weight;
            }
        }
    } else if remaining > 0.0 {
        debug!(remaining, "No unclamped legs to absorb leftover move time");
    }

    let mut clamped_high = 0;
    for duration in durations.iter_mut() {
        if *duration > pacing.max_leg_secs {
            *duration = pacing.max_leg_secs;
            clamped_high += 1;
        }
    }

    debug!(
        legs,
        move_budget,
        clamped_low = clamped_low.iter().filter(|low| **low).count(),
        clamped_high,
        allocated = durations.iter().sum::<f64>(),
        "Allocated leg durations"
    );

    Ok(durations)
}
