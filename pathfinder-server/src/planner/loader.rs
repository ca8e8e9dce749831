//! Per-query timetable clipping.
//!
//! Cuts the global timetable down to the connections departing inside the
//! search horizon, unrolling the daily schedule across midnight as needed,
//! and builds the trip index used later for ride extension. All times in
//! the clipped timetable are absolute seconds from the query day's midnight
//! and may exceed one day.

use std::collections::HashMap;

use crate::domain::{
    Connection, Network, SECONDS_PER_DAY, Seconds, StationCode, StationId, TripId,
};
use crate::timetable::Timetable;

use super::error::PlanError;

/// The query-scoped view of the timetable.
///
/// `trip` fields of the clipped connections index `trip_arrivals`, not the
/// global trip table: a run repeated on the next unrolled day is a distinct
/// trip instance with its own arrival times.
#[derive(Debug, Clone)]
pub struct ClippedTimetable {
    pub origin: StationCode,
    pub destination: StationCode,
    /// The query departure time (seconds of day).
    pub departure: Seconds,
    /// Connections departing in `[departure, departure + horizon)`, sorted
    /// by departure then arrival.
    pub connections: Vec<Connection>,
    /// Per trip instance: station → absolute arrival time of that trip at
    /// that station.
    pub trip_arrivals: Vec<HashMap<StationCode, Seconds>>,
}

/// Clip the global timetable to one query's search window.
///
/// Walk edges leaving the origin are seeded once at the query departure:
/// walking needs no vehicle, so it must not wait for the next timetabled
/// event at the origin (which may never come).
///
/// Fails with [`PlanError::UnknownStation`] when either endpoint is not in
/// the station set; this is distinct from finding no path later.
pub fn clip_timetable(
    timetable: &Timetable,
    network: &Network,
    origin: &StationId,
    destination: &StationId,
    departure: Seconds,
    horizon_secs: Seconds,
) -> Result<ClippedTimetable, PlanError> {
    let origin_code = network
        .code_of(origin)
        .ok_or_else(|| PlanError::UnknownStation(origin.clone()))?;
    let destination_code = network
        .code_of(destination)
        .ok_or_else(|| PlanError::UnknownStation(destination.clone()))?;

    let end = departure + horizon_secs;

    let mut connections = Vec::new();
    let mut instances: HashMap<(TripId, u32), TripId> = HashMap::new();
    let mut trip_arrivals: Vec<HashMap<StationCode, Seconds>> = Vec::new();

    for day in 0..=end / SECONDS_PER_DAY {
        let offset = day * SECONDS_PER_DAY;
        for conn in &timetable.connections {
            let dep = conn.departure + offset;
            if dep < departure {
                continue;
            }
            if dep >= end {
                // Sorted input: nothing later this day can qualify.
                break;
            }

            let trip = conn.trip.map(|trip| {
                *instances.entry((trip, day)).or_insert_with(|| {
                    let id = TripId(trip_arrivals.len() as u32);
                    trip_arrivals.push(
                        timetable.trips[trip.index()]
                            .stops
                            .iter()
                            .map(|s| (s.station, s.arrival + offset))
                            .collect(),
                    );
                    id
                })
            });

            connections.push(Connection {
                from: conn.from,
                to: conn.to,
                departure: dep,
                arrival: conn.arrival + offset,
                kind: conn.kind.clone(),
                trip,
            });
        }
    }

    let seeded = timetable
        .walks
        .iter()
        .filter(|w| w.from == origin_code)
        .map(|w| w.connection_at(departure));
    connections.extend(seeded);
    connections.sort_by(|a, b| a.scan_order(b));

    Ok(ClippedTimetable {
        origin: origin_code,
        destination: destination_code,
        departure,
        connections,
        trip_arrivals,
    })
}
