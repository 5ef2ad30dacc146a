//! Route documents: the JSON a user writes to describe an animation.
//!
//! ```json
//! {
//!   "video": { "duration_sec": 30, "hold_sec": 0.8, "fps": 30, "resolution": "1920x1080" },
//!   "route": [
//!     { "city": "Paris", "country": "France" },
//!     { "city": "Rome", "country": "Italy", "transport": "plane" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{EngineError, InvalidResolution, Resolution, Route, Transport, Waypoint};
use crate::timeline::PacingConfig;

/// Frame rate when the document doesn't set one.
pub const DEFAULT_FPS: u32 = 30;

/// Map style when the document doesn't set one.
pub const DEFAULT_MAP_STYLE: &str = "streets";

/// Label and lookup language when the document doesn't set one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors from reading or validating a route document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed route document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Resolution(#[from] InvalidResolution),
}

/// Output settings for the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSettings {
    /// Requested animation length in seconds.
    pub duration_sec: f64,

    /// Dwell time per waypoint; overrides the pacing default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_sec: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,

    /// Frame size as `WxH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl VideoSettings {
    /// Settings with only a duration; everything else defaults.
    pub fn new(duration_sec: f64) -> Self {
        Self {
            duration_sec,
            hold_sec: None,
            fps: None,
            resolution: None,
            map_style: None,
            language: None,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps.unwrap_or(DEFAULT_FPS)
    }

    /// Parsed frame size, defaulting to 1920x1080.
    pub fn resolution(&self) -> Result<Resolution, InvalidResolution> {
        match &self.resolution {
            Some(s) => Resolution::parse(s),
            None => Ok(Resolution::default()),
        }
    }

    pub fn map_style(&self) -> &str {
        self.map_style.as_deref().unwrap_or(DEFAULT_MAP_STYLE)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Default pacing with this document's hold time applied.
    pub fn pacing(&self) -> PacingConfig {
        self.pacing_from(PacingConfig::default())
    }

    /// `base` with this document's hold time applied, if it sets one.
    pub fn pacing_from(&self, base: PacingConfig) -> PacingConfig {
        match self.hold_sec {
            Some(hold) => base.with_hold_secs(hold),
            None => base,
        }
    }
}

/// One stop as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub city: String,
    pub country: String,
    /// How this stop is reached: `plane`, `train` or `car`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
}

/// A complete animation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDocument {
    pub video: VideoSettings,
    pub route: Vec<RouteStop>,
}

impl RouteDocument {
    /// Parse and validate a document.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input, and the errors from
    /// [`RouteDocument::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use route_animator::document::RouteDocument;
    ///
    /// let doc = RouteDocument::from_json(r#"{
    ///     "video": { "duration_sec": 20 },
    ///     "route": [
    ///         { "city": "Lisbon", "country": "Portugal" },
    ///         { "city": "Porto", "country": "Portugal", "transport": "train" }
    ///     ]
    /// }"#).unwrap();
    ///
    /// assert_eq!(doc.video.fps(), 30);
    /// assert_eq!(doc.route().unwrap().leg_count(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: RouteDocument = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    /// Check everything that can be checked without resolving places.
    ///
    /// # Errors
    ///
    /// - `InvalidPacing` for a non-positive duration, a negative hold or
    ///   a zero frame rate
    /// - `Resolution` for a malformed `WxH`
    /// - `InvalidRoute` for anything [`RouteDocument::route`] rejects
    pub fn validate(&self) -> Result<(), DocumentError> {
        if !self.video.duration_sec.is_finite() || self.video.duration_sec <= 0.0 {
            return Err(EngineError::InvalidPacing("duration_sec must be positive").into());
        }
        if self.video.fps() == 0 {
            return Err(EngineError::InvalidPacing("fps must be positive").into());
        }
        self.video.pacing().validate()?;
        self.video.resolution()?;
        self.route()?;
        Ok(())
    }

    /// Build a validated route, filling missing transports with the
    /// default pacing transport.
    pub fn route(&self) -> Result<Route, EngineError> {
        self.route_with_default(PacingConfig::default().default_transport)
    }

    /// Build a validated route with an explicit default transport.
    pub fn route_with_default(&self, default_transport: Transport) -> Result<Route, EngineError> {
        let waypoints = self
            .route
            .iter()
            .map(|stop| {
                let waypoint = Waypoint::new(&stop.city, &stop.country);
                match &stop.transport {
                    Some(t) => Ok(waypoint.by(Transport::parse(t)?)),
                    None => Ok(waypoint),
                }
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Route::new(waypoints, default_transport)
    }
}
