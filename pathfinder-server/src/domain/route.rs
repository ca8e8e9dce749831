//! Route types.

use std::fmt;

use super::StationId;

/// An opaque route identifier as assigned by the map server.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(String);

impl RouteId {
    /// Wrap a raw route id.
    pub fn new(s: impl Into<String>) -> Self {
        RouteId(s.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transport mode of a route, derived from the map server's type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMode {
    /// Ordinary heavy rail.
    Train,
    /// High-speed rail.
    HighSpeed,
    /// Light rail / tram.
    LightRail,
    /// Ferry.
    Boat,
}

impl RouteMode {
    /// Parse a mode from the snapshot's route type string
    /// (e.g. `train_normal`, `train_high_speed`, `boat_normal`).
    pub fn from_type_str(s: &str) -> Self {
        if s.contains("high_speed") {
            RouteMode::HighSpeed
        } else if s.contains("light_rail") {
            RouteMode::LightRail
        } else if s.starts_with("boat") {
            RouteMode::Boat
        } else {
            RouteMode::Train
        }
    }
}

/// One physical stop along a route.
#[derive(Debug, Clone)]
pub struct RouteStop {
    /// Station served at this stop.
    pub station: StationId,
    /// Platform name displayed at this stop (e.g. "1", "2A").
    pub platform_name: String,
    /// Platform X coordinate (blocks).
    pub x: i64,
    /// Platform Z coordinate (blocks).
    pub z: i64,
}

/// A route from the map snapshot: an ordered stop sequence plus display
/// attributes. A route is one direction of one service pattern; trips of the
/// route all follow `stops` in order.
#[derive(Debug, Clone)]
pub struct Route {
    pub id: RouteId,
    /// Display name; the part before `||` is the line name.
    pub name: String,
    /// Line colour as a packed RGB integer.
    pub color: u32,
    /// Line number (may be empty).
    pub number: String,
    /// Hidden routes are excluded from search unless the query sets the
    /// theoretical override.
    pub hidden: bool,
    pub mode: RouteMode,
    /// Physical stop order along the route.
    pub stops: Vec<RouteStop>,
}

impl Route {
    /// The user-facing exclusion key: `{color}_{line name}_{number}`.
    ///
    /// This is the form route exclusions arrive in from clients, which have
    /// no access to raw route ids.
    pub fn exclusion_key(&self) -> String {
        let line_name = self.name.split("||").next().unwrap_or("");
        format!("{}_{}_{}", self.color, line_name, self.number)
    }
}
