//! Connections and trips: the atomic units of the searchable timetable.

use std::cmp::Ordering;

use super::{RouteId, StationCode};

/// Seconds since the schedule day's midnight. A value may exceed 86400 once
/// the search horizon has been unrolled across midnight; within the global
/// timetable values stay in one day-cycle.
pub type Seconds = u32;

/// Seconds in one schedule day.
pub const SECONDS_PER_DAY: Seconds = 86_400;

/// Identifies a trip within the structure that owns it (the global
/// timetable, or a per-query clipped timetable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripId(pub u32);

impl TripId {
    /// Returns the id as a usize suitable for array indexing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a connection rides on. This doubles as the merge identity during
/// path reconstruction: consecutive legs with equal kinds collapse into one
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LegKind {
    /// In-vehicle leg on a route.
    Ride { route: RouteId },
    /// Walking leg. `exit_transfer` marks an out-of-station interchange as
    /// opposed to a wild walk between unconnected areas.
    Walk { distance: u32, exit_transfer: bool },
}

impl LegKind {
    /// The route id for ride legs.
    pub fn route(&self) -> Option<&RouteId> {
        match self {
            LegKind::Ride { route } => Some(route),
            LegKind::Walk { .. } => None,
        }
    }

    /// True for walking legs.
    pub fn is_walk(&self) -> bool {
        matches!(self, LegKind::Walk { .. })
    }
}

/// One directly-traversable timetabled leg between two stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: StationCode,
    pub to: StationCode,
    pub departure: Seconds,
    pub arrival: Seconds,
    pub kind: LegKind,
    /// Owning trip for ride legs; `None` for walking legs.
    pub trip: Option<TripId>,
}

impl Connection {
    /// Sort key of the global timetable: departure time, ties broken by
    /// arrival time.
    pub fn scan_order(&self, other: &Connection) -> Ordering {
        self.departure
            .cmp(&other.departure)
            .then(self.arrival.cmp(&other.arrival))
    }
}

/// One stop event of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripStop {
    pub station: StationCode,
    pub arrival: Seconds,
    pub departure: Seconds,
}

/// One scheduled run of a route, as an ordered sequence of stop events.
#[derive(Debug, Clone)]
pub struct Trip {
    pub route: RouteId,
    pub stops: Vec<TripStop>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(dep: Seconds, arr: Seconds) -> Connection {
        Connection {
            from: StationCode(0),
            to: StationCode(1),
            departure: dep,
            arrival: arr,
            kind: LegKind::Walk {
                distance: 10,
                exit_transfer: false,
            },
            trip: None,
        }
    }

    #[test]
    fn scan_order_by_departure_then_arrival() {
        assert_eq!(conn(10, 20).scan_order(&conn(15, 16)), Ordering::Less);
        assert_eq!(conn(10, 20).scan_order(&conn(10, 18)), Ordering::Greater);
        assert_eq!(conn(10, 20).scan_order(&conn(10, 20)), Ordering::Equal);
    }

    #[test]
    fn leg_kind_accessors() {
        let ride = LegKind::Ride {
            route: RouteId::new("r1"),
        };
        let walk = LegKind::Walk {
            distance: 5,
            exit_transfer: true,
        };
        assert_eq!(ride.route(), Some(&RouteId::new("r1")));
        assert!(!ride.is_walk());
        assert_eq!(walk.route(), None);
        assert!(walk.is_walk());
    }

    #[test]
    fn walk_kinds_with_same_distance_are_equal() {
        let a = LegKind::Walk {
            distance: 5,
            exit_transfer: false,
        };
        let b = LegKind::Walk {
            distance: 5,
            exit_transfer: false,
        };
        let c = LegKind::Walk {
            distance: 5,
            exit_transfer: true,
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
