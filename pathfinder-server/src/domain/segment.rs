//! The itinerary segment record returned to clients.

use serde::Serialize;

/// One display-ready segment of a planned itinerary.
///
/// An empty `route_id` denotes a walking or platform-transfer segment. The
/// first segment of every itinerary is a synthetic "enter system" segment
/// with an empty start station, and the final segment's end station is
/// blanked to represent arrival at the ultimate destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySegment {
    pub route_id: String,
    pub start_station_id: String,
    pub end_station_id: String,
    pub start_platform_name: String,
    pub end_platform_name: String,
    /// Epoch milliseconds.
    pub start_time: i64,
    /// Epoch milliseconds.
    pub end_time: i64,
    /// Blocks walked; zero for in-vehicle and platform-change segments.
    pub walking_distance: u32,
}

impl ItinerarySegment {
    /// A walking segment (empty route id).
    pub fn walking(
        start_station_id: impl Into<String>,
        end_station_id: impl Into<String>,
        start_platform_name: impl Into<String>,
        end_platform_name: impl Into<String>,
        start_time: i64,
        end_time: i64,
        walking_distance: u32,
    ) -> Self {
        Self {
            route_id: String::new(),
            start_station_id: start_station_id.into(),
            end_station_id: end_station_id.into(),
            start_platform_name: start_platform_name.into(),
            end_platform_name: end_platform_name.into(),
            start_time,
            end_time,
            walking_distance,
        }
    }

    /// True if this is a walking/transfer segment.
    pub fn is_walking(&self) -> bool {
        self.route_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let seg = ItinerarySegment::walking("a", "b", "1", "2", 1000, 2000, 42);
        let json = serde_json::to_value(&seg).unwrap();
        assert_eq!(json["routeId"], "");
        assert_eq!(json["startStationId"], "a");
        assert_eq!(json["endStationId"], "b");
        assert_eq!(json["startPlatformName"], "1");
        assert_eq!(json["endPlatformName"], "2");
        assert_eq!(json["startTime"], 1000);
        assert_eq!(json["endTime"], 2000);
        assert_eq!(json["walkingDistance"], 42);
    }

    #[test]
    fn walking_predicate() {
        let walk = ItinerarySegment::walking("a", "b", "", "", 0, 0, 0);
        assert!(walk.is_walking());

        let mut ride = walk.clone();
        ride.route_id = "r1".to_string();
        assert!(!ride.is_walking());
    }
}
