//! Timetable construction.
//!
//! Converts the snapshot's routes and generated trips into the globally
//! sorted connection set the scan runs over, applying route exclusions, mode
//! filters and station avoidance, and augmenting with walking connections
//! (out-of-station transfers and, when enabled, wild walks between nearby
//! unconnected areas).

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::{
    Connection, LegKind, Network, Route, RouteId, RouteMode, Seconds, StationCode, StationId,
    Trip, TripId, TripStop,
};
use crate::snapshot::RawDepartures;

/// Active filters for one timetable build. Constructed per request from the
/// query plus server-level configuration; never shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableFilters {
    /// Route ids excluded from search (user exclusions, base exclusions and
    /// hidden routes, already resolved to ids).
    pub ignored_routes: BTreeSet<RouteId>,
    pub include_high_speed: bool,
    pub include_boats: bool,
    pub only_light_rail: bool,
    /// Whether to synthesize wild walking connections.
    pub walking_wild: bool,
    /// Stations removed from the network entirely.
    pub avoid_stations: BTreeSet<StationId>,
}

impl Default for TimetableFilters {
    fn default() -> Self {
        Self {
            ignored_routes: BTreeSet::new(),
            include_high_speed: true,
            include_boats: true,
            only_light_rail: false,
            walking_wild: false,
            avoid_stations: BTreeSet::new(),
        }
    }
}

/// Resolve user-facing exclusion keys to route ids.
///
/// A route is ignored if its exclusion key appears in the request's list or
/// the server's base list, or if it is hidden and the theoretical override
/// is not set.
pub fn resolve_ignored_routes(
    network: &Network,
    request_keys: &[String],
    base_keys: &[String],
    in_theory: bool,
) -> BTreeSet<RouteId> {
    let mut ignored = BTreeSet::new();
    for route in network.routes() {
        let key = route.exclusion_key();
        if request_keys.iter().any(|k| k == &key)
            || base_keys.iter().any(|k| k == &key)
            || (route.hidden && !in_theory)
        {
            ignored.insert(route.id.clone());
        }
    }
    ignored
}

/// Parameters governing walking augmentation. The distance threshold and the
/// candidate cap are configuration, not inferred from the data.
#[derive(Debug, Clone)]
pub struct WalkParams {
    /// Maximum block distance for a proximity-derived wild walk.
    pub wild_distance: f64,
    /// Cap on the number of proximity-derived candidate pairs.
    pub max_wild_blocks: usize,
    /// Walking speed in blocks per second; walk duration is
    /// `ceil(distance / speed)`.
    pub walk_speed: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            wild_distance: 500.0,
            max_wild_blocks: 1500,
            walk_speed: 4.3,
        }
    }
}

impl WalkParams {
    /// Walk duration for a given block distance.
    pub fn duration(&self, distance: u32) -> Seconds {
        (distance as f64 / self.walk_speed).ceil() as Seconds
    }
}

/// Operator-supplied walking augmentation tables.
///
/// `transfers` are out-of-station interchanges, always included.
/// `wild` entries are extra wild-walk pairs, honoured only when wild walking
/// is enabled. Both are symmetric.
#[derive(Debug, Clone, Default)]
pub struct WalkTables {
    pub transfers: HashMap<StationId, Vec<StationId>>,
    pub wild: HashMap<StationId, Vec<StationId>>,
}

/// A directed walking edge between two stations, with its duration already
/// derived from the configured walking speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkEdge {
    pub from: StationCode,
    pub to: StationCode,
    /// Block distance, rounded.
    pub distance: u32,
    pub duration: Seconds,
    pub exit_transfer: bool,
}

impl WalkEdge {
    /// Materialise this edge as a connection departing at `departure`.
    pub fn connection_at(self, departure: Seconds) -> Connection {
        Connection {
            from: self.from,
            to: self.to,
            departure,
            arrival: departure + self.duration,
            kind: LegKind::Walk {
                distance: self.distance,
                exit_transfer: self.exit_transfer,
            },
            trip: None,
        }
    }
}

/// The globally sorted connection set plus per-trip stop events.
///
/// Immutable once built; shared read-only across concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    /// Sorted by departure time, ties broken by arrival time.
    pub connections: Vec<Connection>,
    /// Trips indexed by [`TripId`].
    pub trips: Vec<Trip>,
    /// The walking edges behind the synthesized walk connections. The loader
    /// seeds each edge once more at the query departure time, so a walk can
    /// leave the query origin even when no timetabled event touches it.
    pub walks: Vec<WalkEdge>,
}

/// Builds a [`Timetable`] from one snapshot under one filter set.
pub struct TimetableBuilder<'a> {
    network: &'a Network,
    departures: &'a RawDepartures,
    filters: &'a TimetableFilters,
    walk: &'a WalkParams,
    tables: &'a WalkTables,
}

impl<'a> TimetableBuilder<'a> {
    pub fn new(
        network: &'a Network,
        departures: &'a RawDepartures,
        filters: &'a TimetableFilters,
        walk: &'a WalkParams,
        tables: &'a WalkTables,
    ) -> Self {
        Self {
            network,
            departures,
            filters,
            walk,
            tables,
        }
    }

    /// Build the sorted timetable.
    pub fn build(&self) -> Timetable {
        let avoid: HashSet<StationCode> = self
            .filters
            .avoid_stations
            .iter()
            .filter_map(|id| self.network.code_of(id))
            .collect();

        let mut connections = Vec::new();
        let mut trips = Vec::new();

        for route in self.network.routes() {
            if !self.route_allowed(route) {
                continue;
            }
            let Some(route_trips) = self.departures.departures.get(route.id.as_str()) else {
                continue;
            };

            let codes: Vec<Option<StationCode>> = route
                .stops
                .iter()
                .map(|s| self.network.code_of(&s.station))
                .collect();

            for raw_trip in route_trips {
                if raw_trip.stops.len() != codes.len() {
                    warn!(route = %route.id, "trip stop count does not match route; dropping trip");
                    continue;
                }

                let trip_id = TripId(trips.len() as u32);

                for w in 0..codes.len().saturating_sub(1) {
                    let (Some(from), Some(to)) = (codes[w], codes[w + 1]) else {
                        continue;
                    };
                    if from == to || avoid.contains(&from) || avoid.contains(&to) {
                        continue;
                    }
                    let departure = raw_trip.stops[w].departure;
                    let arrival = raw_trip.stops[w + 1].arrival;
                    if arrival < departure {
                        warn!(
                            route = %route.id,
                            departure,
                            arrival,
                            "stop pair arrives before it departs; dropping connection"
                        );
                        continue;
                    }
                    connections.push(Connection {
                        from,
                        to,
                        departure,
                        arrival,
                        kind: LegKind::Ride {
                            route: route.id.clone(),
                        },
                        trip: Some(trip_id),
                    });
                }

                let stops: Vec<TripStop> = raw_trip
                    .stops
                    .iter()
                    .zip(&codes)
                    .filter_map(|(time, code)| {
                        let station = (*code)?;
                        (!avoid.contains(&station)).then_some(TripStop {
                            station,
                            arrival: time.arrival,
                            departure: time.departure,
                        })
                    })
                    .collect();
                trips.push(Trip {
                    route: route.id.clone(),
                    stops,
                });
            }
        }

        let ride_count = connections.len();
        let walks: Vec<WalkEdge> = self
            .walk_pairs(&avoid)
            .into_iter()
            .map(|(from, to, distance, exit_transfer)| WalkEdge {
                from,
                to,
                distance,
                duration: self.walk.duration(distance),
                exit_transfer,
            })
            .collect();
        self.add_walking(&mut connections, &walks);
        connections.sort_by(|a, b| a.scan_order(b));

        debug!(
            rides = ride_count,
            walks = connections.len() - ride_count,
            trips = trips.len(),
            "built timetable"
        );

        Timetable {
            connections,
            trips,
            walks,
        }
    }

    fn route_allowed(&self, route: &Route) -> bool {
        if self.filters.ignored_routes.contains(&route.id) {
            return false;
        }
        if self.filters.only_light_rail && route.mode != RouteMode::LightRail {
            return false;
        }
        match route.mode {
            RouteMode::HighSpeed => self.filters.include_high_speed,
            RouteMode::Boat => self.filters.include_boats,
            RouteMode::Train | RouteMode::LightRail => true,
        }
    }

    /// Synthesize walking connections, chained off every timetabled arrival
    /// and departure event at each walk's origin station. Stations with no
    /// events of their own are covered by the loader's query-time seeding.
    fn add_walking(&self, connections: &mut Vec<Connection>, walks: &[WalkEdge]) {
        if walks.is_empty() {
            return;
        }

        let mut events: Vec<BTreeSet<Seconds>> = vec![BTreeSet::new(); self.network.station_count()];
        for c in connections.iter() {
            events[c.to.index()].insert(c.arrival);
            events[c.from.index()].insert(c.departure);
        }

        for walk in walks {
            for &t in &events[walk.from.index()] {
                connections.push(walk.connection_at(t));
            }
        }
    }

    /// Directed walk pairs: out-of-station transfers first, then (when
    /// enabled) wild additions and proximity-derived pairs, nearest first,
    /// capped at `max_wild_blocks`.
    fn walk_pairs(&self, avoid: &HashSet<StationCode>) -> Vec<(StationCode, StationCode, u32, bool)> {
        let mut pairs = Vec::new();
        let mut seen: HashSet<(StationCode, StationCode)> = HashSet::new();

        let mut add_symmetric =
            |pairs: &mut Vec<(StationCode, StationCode, u32, bool)>,
             seen: &mut HashSet<(StationCode, StationCode)>,
             a: StationCode,
             b: StationCode,
             distance: u32,
             exit_transfer: bool| {
                for (from, to) in [(a, b), (b, a)] {
                    if seen.insert((from, to)) {
                        pairs.push((from, to, distance, exit_transfer));
                    }
                }
            };

        for (table, exit_transfer) in [(&self.tables.transfers, true), (&self.tables.wild, false)] {
            if !exit_transfer && !self.filters.walking_wild {
                continue;
            }
            for (from_id, to_ids) in table {
                let Some(from) = self.network.code_of(from_id) else {
                    continue;
                };
                for to_id in to_ids {
                    let Some(to) = self.network.code_of(to_id) else {
                        continue;
                    };
                    if from == to || avoid.contains(&from) || avoid.contains(&to) {
                        continue;
                    }
                    let distance = self
                        .network
                        .station(from)
                        .distance_to(self.network.station(to))
                        .round() as u32;
                    add_symmetric(&mut pairs, &mut seen, from, to, distance, exit_transfer);
                }
            }
        }

        if self.filters.walking_wild {
            let mut candidates: Vec<(u32, StationCode, StationCode)> = Vec::new();
            let stations: Vec<_> = self
                .network
                .stations()
                .filter(|s| !avoid.contains(&s.code))
                .collect();
            for (i, a) in stations.iter().enumerate() {
                for b in &stations[i + 1..] {
                    let distance = a.distance_to(b);
                    if distance <= self.walk.wild_distance {
                        candidates.push((distance.round() as u32, a.code, b.code));
                    }
                }
            }
            candidates.sort_by_key(|&(d, a, b)| (d, a, b));
            candidates.truncate(self.walk.max_wild_blocks);
            for (distance, a, b) in candidates {
                add_symmetric(&mut pairs, &mut seen, a, b, distance, false);
            }
        }

        pairs
    }
}
