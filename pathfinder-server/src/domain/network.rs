//! The indexed snapshot: stations with dense codes, plus the route table.

use std::collections::HashMap;

use super::{Route, RouteId, Station, StationCode, StationId};

/// An immutable, indexed view of one map snapshot.
///
/// Dense station codes are assigned here, in sorted id order so that the
/// same snapshot always yields the same numbering. Once built, a network is
/// shared read-only across concurrent queries; a snapshot refresh builds a
/// whole new `Network` and swaps it in.
#[derive(Debug, Clone)]
pub struct Network {
    /// Stations indexed by code.
    stations: Vec<Station>,
    /// Id → code lookup.
    codes: HashMap<StationId, StationCode>,
    /// Routes by id.
    routes: HashMap<RouteId, Route>,
}

impl Network {
    /// Index raw stations and routes into a network.
    ///
    /// `stations` entries are `(id, x, z)`. Duplicate ids keep the first
    /// occurrence.
    pub fn from_parts(
        mut stations: Vec<(StationId, i64, i64)>,
        routes: Vec<Route>,
    ) -> Self {
        stations.sort_by(|a, b| a.0.cmp(&b.0));
        stations.dedup_by(|a, b| a.0 == b.0);

        let mut indexed = Vec::with_capacity(stations.len());
        let mut codes = HashMap::with_capacity(stations.len());
        for (i, (id, x, z)) in stations.into_iter().enumerate() {
            let code = StationCode(i as u32);
            codes.insert(id.clone(), code);
            indexed.push(Station { id, code, x, z });
        }

        let routes = routes.into_iter().map(|r| (r.id.clone(), r)).collect();

        Self {
            stations: indexed,
            codes,
            routes,
        }
    }

    /// Number of stations; codes span `[0, station_count)`.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Look up a station's dense code by id.
    pub fn code_of(&self, id: &StationId) -> Option<StationCode> {
        self.codes.get(id).copied()
    }

    /// The station at a given code.
    pub fn station(&self, code: StationCode) -> &Station {
        &self.stations[code.index()]
    }

    /// The id of the station at a given code.
    pub fn id_of(&self, code: StationCode) -> &StationId {
        &self.stations[code.index()].id
    }

    /// Iterate all stations in code order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Look up a route by id.
    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    /// Iterate all routes in unspecified order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }
}
