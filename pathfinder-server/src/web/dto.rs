//! Request and response DTOs for the directions API.

use serde::{Deserialize, Serialize};

use crate::domain::ItinerarySegment;

/// A directions query as posted by map clients.
///
/// Everything except the two endpoints is optional and defaults to the
/// plain search: all modes, no exclusions, depart now.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRequest {
    pub start_station_id: String,
    pub end_station_id: String,
    #[serde(default)]
    pub enable_walking_wild: bool,
    #[serde(default, rename = "noHSR")]
    pub no_hsr: bool,
    #[serde(default)]
    pub no_boats: bool,
    #[serde(default)]
    pub only_light_rail: bool,
    /// Exclusion keys (`{color}_{line name}_{number}`).
    #[serde(default)]
    pub ignored_lines: Vec<String>,
    #[serde(default)]
    pub avoid_stations: Vec<String>,
    /// Include hidden routes.
    #[serde(default)]
    pub in_theory: bool,
    /// Departure time as seconds of day; defaults to shortly after now.
    #[serde(default)]
    pub start_time: Option<u32>,
}

/// The response envelope the map client expects.
///
/// Always `code` 200: planner failures degrade to an empty connection
/// list rather than an error status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsEnvelope {
    pub code: u16,
    pub current_time: i64,
    pub text: String,
    pub version: u32,
    pub data: DirectionsData,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsData {
    pub connections: Vec<ItinerarySegment>,
}

impl DirectionsEnvelope {
    pub fn ok(current_time: i64, connections: Vec<ItinerarySegment>) -> Self {
        Self {
            code: 200,
            current_time,
            text: "OK - pathfinder".to_string(),
            version: 1,
            data: DirectionsData { connections },
        }
    }
}
