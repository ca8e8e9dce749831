//! Planner error taxonomy.
//!
//! All three outcomes degrade to an empty itinerary at the web boundary,
//! but they are distinct here so the logs can tell a typo'd station from a
//! genuinely unreachable one from a search that ran out of budget.

use crate::domain::StationId;

/// Error from the journey-planning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Origin or destination is not in the station set.
    #[error("unknown station: {0}")]
    UnknownStation(StationId),

    /// No connection chain reaches the destination within the horizon.
    #[error("no connection found within the search horizon")]
    NoConnection,

    /// The scan exceeded its wall-clock budget.
    #[error("search exceeded its time budget")]
    Timeout,
}
