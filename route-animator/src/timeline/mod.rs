//! Timeline engine.
//!
//! Turns a route with known leg distances into a fixed schedule of
//! discrete events, then answers "what is on screen at time t?" from that
//! schedule alone:
//!
//! - [`allocate_leg_durations`] splits the animation time across legs
//! - [`Schedule::build`] lays out start, move, label and arrival events
//! - [`resolve`] replays the schedule up to a query time
//! - [`sample_position`] and [`derive_zoom`] place the camera
//!
//! Nothing here does I/O or depends on where it runs, so the server and
//! any renderer share exactly the same timing.

mod allocate;
mod config;
mod motion;
mod playback;
mod schedule;

pub use allocate::allocate_leg_durations;
pub use config::PacingConfig;
pub use motion::{MAX_ZOOM, MIN_ZOOM, derive_zoom, ease_in_out_cubic, sample_position};
pub use playback::{ActiveLeg, PlaybackState, resolve};
pub use schedule::{EventKind, LegMove, Schedule, TimelineEvent};
