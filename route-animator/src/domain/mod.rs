//! Domain types for the route animator.
//!
//! These types represent validated route data. All types enforce their
//! invariants at construction time, so the timeline engine can trust
//! whatever it receives.

mod coordinate;
mod error;
mod resolution;
mod waypoint;

pub use coordinate::{Coordinate, InvalidCoordinate, Place};
pub use error::EngineError;
pub use resolution::{InvalidResolution, Resolution};
pub use waypoint::{Route, Transport, Waypoint};
