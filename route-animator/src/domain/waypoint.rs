//! Waypoints, transport modes, and validated routes.

use std::fmt;

use super::EngineError;

/// How a leg is travelled.
///
/// Air travel follows the great circle; surface travel follows a straight
/// line on the flattened map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Plane,
    Train,
    Car,
}

impl Transport {
    /// Parse a transport mode.
    ///
    /// Accepts `plane`, `train` or `car`, ignoring case and surrounding
    /// whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_animator::domain::Transport;
    ///
    /// assert_eq!(Transport::parse("plane").unwrap(), Transport::Plane);
    /// assert_eq!(Transport::parse(" Train ").unwrap(), Transport::Train);
    /// assert!(Transport::parse("boat").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plane" => Ok(Transport::Plane),
            "train" => Ok(Transport::Train),
            "car" => Ok(Transport::Car),
            _ => Err(EngineError::InvalidRoute(format!(
                "unknown transport '{s}' (expected plane, train or car)"
            ))),
        }
    }

    /// Returns the lowercase name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Plane => "plane",
            Transport::Train => "train",
            Transport::Car => "car",
        }
    }

    /// Returns true if this leg is flown along the great circle.
    pub fn is_airborne(&self) -> bool {
        matches!(self, Transport::Plane)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named stop on the route.
///
/// `transport` is the mode used to *reach* this waypoint, so the first
/// waypoint never carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    pub city: String,
    pub country: String,
    pub transport: Option<Transport>,
}

impl Waypoint {
    /// Creates a waypoint without an incoming transport.
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            transport: None,
        }
    }

    /// Sets the incoming transport.
    pub fn by(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }
}

/// An ordered, validated list of waypoints.
///
/// # Invariants
///
/// - At least two waypoints
/// - The first waypoint has no transport
/// - Every later waypoint has a transport (filled from the default if absent)
/// - Every city name is non-blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Validate waypoints and fill in missing transports.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRoute` if:
    /// - Fewer than two waypoints are given
    /// - The first waypoint carries a transport
    /// - A city name is blank
    ///
    /// # Examples
    ///
    /// ```
    /// use route_animator::domain::{Route, Transport, Waypoint};
    ///
    /// let route = Route::new(
    ///     vec![
    ///         Waypoint::new("Paris", "France"),
    ///         Waypoint::new("Berlin", "Germany"),
    ///         Waypoint::new("Vienna", "Austria").by(Transport::Train),
    ///     ],
    ///     Transport::Plane,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(route.leg_count(), 2);
    /// assert_eq!(route.leg_transport(0), Some(Transport::Plane));
    /// assert_eq!(route.leg_transport(1), Some(Transport::Train));
    /// ```
    pub fn new(
        mut waypoints: Vec<Waypoint>,
        default_transport: Transport,
    ) -> Result<Self, EngineError> {
        if waypoints.len() < 2 {
            return Err(EngineError::InvalidRoute(format!(
                "route needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }

        if let Some(transport) = waypoints[0].transport {
            return Err(EngineError::InvalidRoute(format!(
                "first waypoint {} cannot have a transport (got {transport})",
                waypoints[0].city
            )));
        }

        for (i, waypoint) in waypoints.iter_mut().enumerate() {
            if waypoint.city.trim().is_empty() {
                return Err(EngineError::InvalidRoute(format!(
                    "waypoint {i} has an empty city name"
                )));
            }
            if i > 0 && waypoint.transport.is_none() {
                waypoint.transport = Some(default_transport);
            }
        }

        Ok(Route { waypoints })
    }

    /// Returns all waypoints in order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Returns the waypoint at `index`, if any.
    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Returns the number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false: a route has at least two waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Returns the number of legs (waypoints - 1).
    pub fn leg_count(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Returns the transport for leg `leg` (waypoint `leg` to `leg + 1`).
    pub fn leg_transport(&self, leg: usize) -> Option<Transport> {
        self.waypoints.get(leg + 1).and_then(|w| w.transport)
    }
}
