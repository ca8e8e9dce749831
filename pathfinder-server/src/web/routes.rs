//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Local, Timelike};
use tracing::{info, warn};

use crate::domain::{ItinerarySegment, SECONDS_PER_DAY, StationId};
use crate::planner::{self, PlanError};
use crate::timetable::{
    TimetableBuilder, TimetableFilters, TimetableKey, resolve_ignored_routes,
};

use super::dto::{DirectionsEnvelope, DirectionsRequest};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(directions))
        .route("/health", get(health))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The directions endpoint.
///
/// Fail-open: malformed bodies and every planner failure produce the usual
/// envelope with an empty connection list. The underlying fault is logged
/// server-side so the degradation is never silent.
async fn directions(State(state): State<AppState>, body: Bytes) -> Json<DirectionsEnvelope> {
    let now = Local::now();
    let connections = plan_directions(&state, &body, &now).await;
    Json(DirectionsEnvelope::ok(now.timestamp_millis(), connections))
}

async fn plan_directions(
    state: &AppState,
    body: &[u8],
    now: &DateTime<Local>,
) -> Vec<ItinerarySegment> {
    // Parse JSON manually so the body can be logged on failure.
    let req: DirectionsRequest = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            warn!(
                error = %e,
                body = %String::from_utf8_lossy(body),
                "malformed directions request"
            );
            return Vec::new();
        }
    };

    let origin = match StationId::parse(&req.start_station_id) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "invalid start station id");
            return Vec::new();
        }
    };
    let destination = match StationId::parse(&req.end_station_id) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "invalid end station id");
            return Vec::new();
        }
    };

    let snapshot = state.snapshot.read().await.clone();
    let config = &state.config;

    let seconds_now = now.time().num_seconds_from_midnight();
    let departure = req.start_time.unwrap_or(seconds_now + 10) % SECONDS_PER_DAY;
    // Today's local midnight in epoch ms, the base for output timestamps.
    let midnight_ms = now.timestamp_millis()
        - i64::from(seconds_now) * 1000
        - i64::from(now.timestamp_subsec_millis());

    let filters = TimetableFilters {
        ignored_routes: resolve_ignored_routes(
            &snapshot.network,
            &req.ignored_lines,
            &config.base_ignored_lines,
            req.in_theory,
        ),
        include_high_speed: !req.no_hsr,
        include_boats: !req.no_boats,
        only_light_rail: req.only_light_rail,
        walking_wild: req.enable_walking_wild,
        avoid_stations: req
            .avoid_stations
            .iter()
            .filter_map(|s| StationId::parse(s).ok())
            .collect(),
    };

    let key = TimetableKey::new(
        &filters,
        &snapshot.network_version,
        &snapshot.departures_version,
    );
    let timetable = match state.timetables.get(&key).await {
        Some(tt) => tt,
        None => {
            let built = Arc::new(
                TimetableBuilder::new(
                    &snapshot.network,
                    &snapshot.departures,
                    &filters,
                    &config.walk_params,
                    &config.walk_tables,
                )
                .build(),
            );
            state.timetables.insert(key, built.clone()).await;
            built
        }
    };

    match planner::plan(
        &snapshot.network,
        &timetable,
        &origin,
        &destination,
        departure,
        &config.planner,
        midnight_ms,
    ) {
        Ok(segments) => segments,
        Err(e @ PlanError::UnknownStation(_)) => {
            warn!(error = %e, "directions request failed");
            Vec::new()
        }
        Err(e @ PlanError::NoConnection) => {
            info!(%origin, %destination, error = %e, "no itinerary found");
            Vec::new()
        }
        Err(e @ PlanError::Timeout) => {
            warn!(%origin, %destination, error = %e, "directions search timed out");
            Vec::new()
        }
    }
}
