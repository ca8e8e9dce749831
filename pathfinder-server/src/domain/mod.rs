//! Domain types for the journey planner.
//!
//! The core model of one map snapshot: stations with dense codes, routes
//! with physical stop sequences, trips, and the connections the scan runs
//! over. All types enforce their invariants at construction time.

mod connection;
mod network;
mod route;
mod segment;
mod station;

pub use connection::{
    Connection, LegKind, SECONDS_PER_DAY, Seconds, Trip, TripId, TripStop,
};
pub use network::Network;
pub use route::{Route, RouteId, RouteMode, RouteStop};
pub use segment::ItinerarySegment;
pub use station::{InvalidStationId, Station, StationCode, StationId};
