//! Web layer for the route animator.
//!
//! Provides HTTP endpoints that build schedules and sample frames, using
//! the same engine a renderer would.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, build_timeline, create_router, prepare_session, sample_frames};
pub use state::{AppState, DEFAULT_MAX_FRAMES};
