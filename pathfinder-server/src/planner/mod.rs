//! The journey planner: clip, scan, post-process.

mod config;
mod csa;
mod error;
mod loader;
mod path;

pub use config::PlannerConfig;
pub use csa::CsaEngine;
pub use error::PlanError;
pub use loader::{ClippedTimetable, clip_timetable};
pub use path::process_path;

use crate::domain::{ItinerarySegment, Network, Seconds, StationId};
use crate::timetable::Timetable;

/// Plan one journey and return display-ready segments.
///
/// `departure` is seconds past midnight on the query day; `midnight_ms` is
/// that midnight as epoch milliseconds, used to stamp the output segments.
/// Planning between a station and itself yields an empty itinerary.
pub fn plan(
    network: &Network,
    timetable: &Timetable,
    origin: &StationId,
    destination: &StationId,
    departure: Seconds,
    config: &PlannerConfig,
    midnight_ms: i64,
) -> Result<Vec<ItinerarySegment>, PlanError> {
    if origin == destination {
        // Still surface a typo'd id rather than a silent empty plan.
        network
            .code_of(origin)
            .ok_or_else(|| PlanError::UnknownStation(origin.clone()))?;
        return Ok(Vec::new());
    }

    let clipped = clip_timetable(
        timetable,
        network,
        origin,
        destination,
        departure,
        config.horizon_secs(),
    )?;
    let engine = CsaEngine::new(&clipped, network.station_count(), config.timeout());
    let legs = engine.compute()?;

    Ok(process_path(
        &legs,
        &clipped.trip_arrivals,
        network,
        config.detail,
        midnight_ms,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Connection, LegKind, Route, RouteId, RouteMode, RouteStop, StationCode, Trip, TripId,
        TripStop,
    };

    fn sid(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn stop(station: &str, platform: &str, x: i64, z: i64) -> RouteStop {
        RouteStop {
            station: sid(station),
            platform_name: platform.to_string(),
            x,
            z,
        }
    }

    fn sample_network() -> Network {
        Network::from_parts(
            vec![(sid("a"), 0, 0), (sid("b"), 100, 0), (sid("c"), 200, 0)],
            vec![Route {
                id: RouteId::new("r1"),
                name: "Main Line".to_string(),
                color: 0xff0000,
                number: "1".to_string(),
                hidden: false,
                mode: RouteMode::Train,
                stops: vec![
                    stop("a", "1", 0, 0),
                    stop("b", "2", 100, 0),
                    stop("c", "3", 200, 0),
                ],
            }],
        )
    }

    fn sample_timetable() -> Timetable {
        let ride = |from: u32, to: u32, dep: Seconds, arr: Seconds| Connection {
            from: StationCode(from),
            to: StationCode(to),
            departure: dep,
            arrival: arr,
            kind: LegKind::Ride {
                route: RouteId::new("r1"),
            },
            trip: Some(TripId(0)),
        };
        Timetable {
            connections: vec![ride(0, 1, 100, 200), ride(1, 2, 210, 300)],
            trips: vec![Trip {
                route: RouteId::new("r1"),
                stops: vec![
                    TripStop {
                        station: StationCode(0),
                        arrival: 100,
                        departure: 100,
                    },
                    TripStop {
                        station: StationCode(1),
                        arrival: 200,
                        departure: 210,
                    },
                    TripStop {
                        station: StationCode(2),
                        arrival: 300,
                        departure: 300,
                    },
                ],
            }],
            walks: Vec::new(),
        }
    }

    #[test]
    fn plans_end_to_end() {
        let net = sample_network();
        let tt = sample_timetable();

        let segs = plan(
            &net,
            &tt,
            &sid("a"),
            &sid("c"),
            0,
            &PlannerConfig::default(),
            0,
        )
        .unwrap();

        // Enter, a→b, b→(blanked c): the two scanned legs ride the same
        // trip and collapse to one boarding.
        assert_eq!(segs.len(), 3);
        assert!(segs[0].is_walking());
        assert_eq!(segs[1].route_id, "r1");
        assert_eq!(segs[2].end_station_id, "");
        assert_eq!(segs[2].end_time, 300_000);
    }

    #[test]
    fn same_station_plans_empty() {
        let net = sample_network();
        let tt = sample_timetable();
        let segs = plan(
            &net,
            &tt,
            &sid("a"),
            &sid("a"),
            0,
            &PlannerConfig::default(),
            0,
        )
        .unwrap();
        assert!(segs.is_empty());
    }

    #[test]
    fn unknown_station_is_reported() {
        let net = sample_network();
        let tt = sample_timetable();
        let err = plan(
            &net,
            &tt,
            &sid("nowhere"),
            &sid("nowhere"),
            0,
            &PlannerConfig::default(),
            0,
        )
        .unwrap_err();
        assert_eq!(err, PlanError::UnknownStation(sid("nowhere")));
    }

    #[test]
    fn direct_trip_just_before_departure() {
        // One run at 08:00:00 → 08:05:00, queried at 07:59:50.
        let net = sample_network();
        let ride = |from: u32, to: u32, dep: Seconds, arr: Seconds| Connection {
            from: StationCode(from),
            to: StationCode(to),
            departure: dep,
            arrival: arr,
            kind: LegKind::Ride {
                route: RouteId::new("r1"),
            },
            trip: Some(TripId(0)),
        };
        let tt = Timetable {
            connections: vec![ride(0, 1, 28_800, 29_100)],
            trips: vec![Trip {
                route: RouteId::new("r1"),
                stops: vec![
                    TripStop {
                        station: StationCode(0),
                        arrival: 28_800,
                        departure: 28_800,
                    },
                    TripStop {
                        station: StationCode(1),
                        arrival: 29_100,
                        departure: 29_100,
                    },
                ],
            }],
            walks: Vec::new(),
        };

        let segs = plan(
            &net,
            &tt,
            &sid("a"),
            &sid("b"),
            28_790,
            &PlannerConfig::default(),
            0,
        )
        .unwrap();

        assert_eq!(segs.len(), 2);
        let in_vehicle = &segs[1];
        assert_eq!(in_vehicle.route_id, "r1");
        assert_eq!(in_vehicle.start_time, 28_800_000);
        assert_eq!(in_vehicle.end_time, 29_100_000);
    }

    #[test]
    fn wider_horizon_only_reveals_later_options() {
        let net = sample_network();
        let tt = sample_timetable();

        let narrow = PlannerConfig::default();
        let wide = PlannerConfig {
            max_hour: 24,
            ..PlannerConfig::default()
        };

        // A run inside both horizons arrives at the same time either way.
        let a = plan(&net, &tt, &sid("a"), &sid("c"), 0, &narrow, 0).unwrap();
        let b = plan(&net, &tt, &sid("a"), &sid("c"), 0, &wide, 0).unwrap();
        assert_eq!(
            a.last().map(|s| s.end_time),
            b.last().map(|s| s.end_time)
        );

        // A run beyond the narrow horizon is only found by the wide one.
        assert_eq!(
            plan(&net, &tt, &sid("a"), &sid("c"), 400, &narrow, 0).unwrap_err(),
            PlanError::NoConnection
        );
        let next_day = plan(&net, &tt, &sid("a"), &sid("c"), 400, &wide, 0).unwrap();
        assert_eq!(
            next_day.last().map(|s| s.end_time),
            Some(i64::from(86_400 + 300) * 1000)
        );
    }

    #[test]
    fn wild_walk_leaves_an_unserved_origin() {
        // The rider starts 100 blocks from a served station; no timetabled
        // event ever touches the origin, so the walk there must begin at the
        // query departure itself.
        use std::collections::HashMap;

        use crate::snapshot::{RawDepartures, RawStopTime, RawTrip};
        use crate::timetable::{TimetableBuilder, TimetableFilters, WalkParams, WalkTables};

        let net = Network::from_parts(
            vec![
                (sid("field"), 0, 0),
                (sid("hub"), 100, 0),
                (sid("term"), 10_000, 0),
            ],
            vec![Route {
                id: RouteId::new("r1"),
                name: "Main Line".to_string(),
                color: 0xff0000,
                number: "1".to_string(),
                hidden: false,
                mode: RouteMode::Train,
                stops: vec![stop("hub", "1", 100, 0), stop("term", "1", 10_000, 0)],
            }],
        );
        let deps = RawDepartures {
            departures: HashMap::from([(
                "r1".to_string(),
                vec![RawTrip {
                    stops: vec![
                        RawStopTime {
                            arrival: 1_000,
                            departure: 1_000,
                        },
                        RawStopTime {
                            arrival: 1_100,
                            departure: 1_100,
                        },
                    ],
                }],
            )]),
        };
        let filters = TimetableFilters {
            walking_wild: true,
            ..TimetableFilters::default()
        };
        let walk = WalkParams {
            wild_distance: 200.0,
            ..WalkParams::default()
        };
        let tt =
            TimetableBuilder::new(&net, &deps, &filters, &walk, &WalkTables::default()).build();

        let segs = plan(
            &net,
            &tt,
            &sid("field"),
            &sid("term"),
            500,
            &PlannerConfig::default(),
            0,
        )
        .unwrap();

        // Enter, walk to the hub, ride to the (blanked) terminus.
        assert_eq!(segs.len(), 3);
        let on_foot = &segs[1];
        assert!(on_foot.is_walking());
        assert_eq!(on_foot.walking_distance, 100);
        assert_eq!(on_foot.start_time, 500_000);
        assert_eq!(on_foot.end_time, i64::from(500 + walk.duration(100)) * 1000);
        assert_eq!(segs[2].route_id, "r1");
        assert_eq!(segs[2].end_time, 1_100_000);
    }

    #[test]
    fn out_of_horizon_trip_is_unreachable() {
        let net = sample_network();
        let tt = sample_timetable();
        // Departing just after the only run, with the horizon ending before
        // its next-day repeat.
        let err = plan(
            &net,
            &tt,
            &sid("a"),
            &sid("c"),
            400,
            &PlannerConfig::default(),
            0,
        )
        .unwrap_err();
        assert_eq!(err, PlanError::NoConnection);
    }
}
