//! Raw DTOs for the two persisted snapshot files, and their conversion into
//! the indexed domain model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Network, Route, RouteId, RouteMode, RouteStop, StationId};

/// The reference-data file: station table plus route table with ordered
/// stops, keyed by raw id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNetwork {
    pub stations: HashMap<String, RawStation>,
    pub routes: HashMap<String, RawRoute>,
}

/// A station as stored in the reference-data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStation {
    pub x: i64,
    pub z: i64,
}

/// A route as stored in the reference-data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRoute {
    pub name: String,
    pub color: u32,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(rename = "type")]
    pub route_type: String,
    pub stations: Vec<RawRouteStop>,
}

/// A stop record within a raw route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRouteStop {
    pub id: String,
    /// Platform name at this stop.
    pub name: String,
    pub x: i64,
    pub z: i64,
}

/// The trip-departure file: for each route id, the generated trips, each a
/// per-stop time list aligned with the route's stop sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDepartures {
    pub departures: HashMap<String, Vec<RawTrip>>,
}

/// One generated run of a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrip {
    pub stops: Vec<RawStopTime>,
}

/// Arrival/departure seconds-of-day at one stop of a trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawStopTime {
    pub arrival: u32,
    pub departure: u32,
}

impl RawNetwork {
    /// Index the raw tables into a [`Network`], dropping malformed entries.
    pub fn to_network(&self) -> Network {
        let mut stations = Vec::with_capacity(self.stations.len());
        for (id, raw) in &self.stations {
            match StationId::parse(id) {
                Ok(id) => stations.push((id, raw.x, raw.z)),
                Err(e) => warn!(station = %id, error = %e, "dropping station"),
            }
        }

        let mut routes = Vec::with_capacity(self.routes.len());
        for (id, raw) in &self.routes {
            let mut stops = Vec::with_capacity(raw.stations.len());
            let mut ok = true;
            for stop in &raw.stations {
                match StationId::parse(&stop.id) {
                    Ok(station) => stops.push(RouteStop {
                        station,
                        platform_name: stop.name.clone(),
                        x: stop.x,
                        z: stop.z,
                    }),
                    Err(e) => {
                        warn!(route = %id, station = %stop.id, error = %e,
                            "dropping route with malformed stop");
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                routes.push(Route {
                    id: RouteId::new(id.clone()),
                    name: raw.name.clone(),
                    color: raw.color,
                    number: raw.number.clone(),
                    hidden: raw.hidden,
                    mode: RouteMode::from_type_str(&raw.route_type),
                    stops,
                });
            }
        }

        Network::from_parts(stations, routes)
    }
}
