//! Itinerary post-processing.
//!
//! Turns the raw leg chain from the scan into display-ready segments in
//! three passes: extend rides backwards onto earlier boardings of the same
//! trip, merge consecutive legs of the same route, then expand each leg
//! into per-stop segments with platform transfers and entry/exit framing.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{
    Connection, ItinerarySegment, LegKind, Network, Seconds, StationCode, StationId,
};

/// Replace rides with longer stays on the same trip where possible.
///
/// The scan may hop off a trip and back onto it when an intermediate
/// connection briefly looked better. Walking backwards through the chain,
/// each ride leg is re-anchored to the earliest prior leg whose origin the
/// trip also serves no earlier than that leg's own departure; the legs in
/// between are then absorbed. Arrival times never change, so the result is
/// still an earliest-arrival chain.
fn extend_rides(
    legs: &[Connection],
    trip_arrivals: &[HashMap<StationCode, Seconds>],
) -> Vec<Connection> {
    let mut out = Vec::with_capacity(legs.len());
    let mut low = usize::MAX;

    for i in (0..legs.len()).rev() {
        if i >= low {
            continue;
        }

        let mut leg = legs[i].clone();
        if let Some(trip) = leg.trip {
            let arrivals = &trip_arrivals[trip.index()];
            for j in (0..i).rev() {
                let from = legs[j].from;
                if let Some(&board) = arrivals.get(&from) {
                    if board >= legs[j].departure {
                        leg.from = from;
                        leg.departure = board;
                        low = j;
                    }
                }
            }
        }
        out.push(leg);
    }

    out.reverse();
    out
}

/// Collapse consecutive legs of equal kind into one, unless `detail` asks
/// for every stop boundary to survive.
fn merge_legs(legs: Vec<Connection>, detail: bool) -> Vec<Connection> {
    let mut merged: Vec<Connection> = Vec::new();
    for leg in legs {
        match merged.last_mut() {
            Some(last) if !detail && last.kind == leg.kind => {
                last.to = leg.to;
                last.arrival = leg.arrival;
            }
            _ => merged.push(leg),
        }
    }
    merged
}

/// Indices `(i, j)` of the shortest contiguous run in `ids` from `a` to
/// `b`, or `None` when no such run exists. On looping routes the same
/// station appears more than once; the nearest preceding `a` is kept so the
/// window never spans a full loop.
fn shortest_subsequence(ids: &[&StationId], a: &StationId, b: &StationId) -> Option<(usize, usize)> {
    let mut last_a = None;
    let mut best: Option<(usize, usize, usize)> = None;

    for (j, id) in ids.iter().enumerate() {
        if *id == a {
            last_a = Some(j);
        } else if *id == b {
            if let Some(i) = last_a {
                let len = j - i;
                if best.is_none_or(|(l, _, _)| len < l) {
                    best = Some((len, i, j));
                }
            }
        }
    }

    best.map(|(_, i, j)| (i, j))
}

fn build_itinerary(
    merged: &[Connection],
    network: &Network,
    midnight_ms: i64,
) -> Vec<ItinerarySegment> {
    let ms = |sec: Seconds| midnight_ms + i64::from(sec) * 1000;

    let mut segments: Vec<ItinerarySegment> = Vec::new();
    // Platform coordinates of the previous ride's alighting stop; a change
    // of coordinates forces a platform walk even under an unchanged name.
    let mut last_xz: Option<(i64, i64)> = None;

    for leg in merged {
        let start_ms = ms(leg.departure);
        let end_ms = ms(leg.arrival);

        match &leg.kind {
            LegKind::Ride { route: route_id } => {
                let Some(route) = network.route(route_id) else {
                    warn!(route = %route_id, "route missing from snapshot, leg dropped");
                    continue;
                };
                let ids: Vec<&StationId> =
                    route.stops.iter().map(|s| &s.station).collect();
                let from_sid = network.id_of(leg.from);
                let to_sid = network.id_of(leg.to);
                let Some((lo, hi)) = shortest_subsequence(&ids, from_sid, to_sid) else {
                    warn!(route = %route_id, "leg endpoints not on route, leg dropped");
                    continue;
                };
                let stops = &route.stops[lo..=hi];
                let first = &stops[0];

                let mut platform_walk = None;
                if let Some(prev) = segments.last_mut() {
                    if prev.is_walking() {
                        // A walk's destination platform is wherever the
                        // next boarding happens.
                        prev.end_platform_name = first.platform_name.clone();
                    } else if prev.end_platform_name != first.platform_name
                        || last_xz.is_some_and(|(x, z)| first.x != x || first.z != z)
                    {
                        platform_walk = Some(ItinerarySegment::walking(
                            prev.end_station_id.clone(),
                            first.station.as_str(),
                            prev.end_platform_name.clone(),
                            first.platform_name.clone(),
                            prev.end_time,
                            start_ms,
                            0,
                        ));
                    }
                }
                if let Some(seg) = platform_walk {
                    segments.push(seg);
                }

                for pair in stops.windows(2) {
                    segments.push(ItinerarySegment {
                        route_id: route_id.as_str().to_string(),
                        start_station_id: pair[0].station.as_str().to_string(),
                        end_station_id: pair[1].station.as_str().to_string(),
                        start_platform_name: pair[0].platform_name.clone(),
                        end_platform_name: pair[1].platform_name.clone(),
                        start_time: start_ms,
                        end_time: start_ms,
                        walking_distance: 0,
                    });
                }
                if let Some(last) = segments.last_mut() {
                    last.end_time = end_ms;
                }

                let alight = &stops[stops.len() - 1];
                last_xz = Some((alight.x, alight.z));
            }
            LegKind::Walk { distance, .. } => {
                let start_platform = segments
                    .last()
                    .map(|s| s.end_platform_name.clone())
                    .unwrap_or_default();
                segments.push(ItinerarySegment::walking(
                    network.id_of(leg.from).as_str(),
                    network.id_of(leg.to).as_str(),
                    start_platform,
                    "",
                    start_ms,
                    end_ms,
                    *distance,
                ));
                last_xz = None;
            }
        }
    }

    if let Some(last) = segments.last_mut() {
        // Exiting the system at the end.
        last.end_station_id = String::new();
    }
    if let Some(first) = segments.first() {
        let enter = ItinerarySegment::walking(
            "",
            first.start_station_id.clone(),
            "",
            first.start_platform_name.clone(),
            first.start_time,
            first.start_time,
            0,
        );
        segments.insert(0, enter);
    }

    segments
}

/// Run the full post-processing pipeline on a leg chain.
pub fn process_path(
    legs: &[Connection],
    trip_arrivals: &[HashMap<StationCode, Seconds>],
    network: &Network,
    detail: bool,
    midnight_ms: i64,
) -> Vec<ItinerarySegment> {
    let extended = extend_rides(legs, trip_arrivals);
    let merged = merge_legs(extended, detail);
    build_itinerary(&merged, network, midnight_ms)
}
