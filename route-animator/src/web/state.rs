//! Application state for the web layer.

use std::sync::Arc;

use crate::geocode::Geocoder;
use crate::timeline::PacingConfig;

/// Largest number of frames a single request may ask for.
pub const DEFAULT_MAX_FRAMES: usize = 20_000;

/// Shared application state.
///
/// Generic over the geocoder so tests can run the real handlers against
/// a fixed table.
pub struct AppState<G> {
    /// Resolves waypoints the request didn't give coordinates for
    pub geocoder: Arc<G>,

    /// Base pacing; a document's `hold_sec` overrides the hold time
    pub pacing: Arc<PacingConfig>,

    /// Upper bound on frames sampled per request
    pub max_frames: usize,
}

impl<G: Geocoder> AppState<G> {
    /// Create a new app state with default pacing.
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            pacing: Arc::new(PacingConfig::default()),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = Arc::new(pacing);
        self
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }
}

// Manual impl: deriving would require `G: Clone`.
impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            geocoder: Arc::clone(&self.geocoder),
            pacing: Arc::clone(&self.pacing),
            max_frames: self.max_frames,
        }
    }
}
