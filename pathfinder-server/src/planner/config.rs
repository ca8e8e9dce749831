//! Configuration for the journey planner.

use std::time::Duration;

/// Parameters for one planning run. Owned by the caller and passed by
/// reference per request; there is no shared mutable default.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum look-ahead past the query departure time, in hours.
    pub max_hour: u32,

    /// Wall-clock budget for the connection scan, in minutes.
    pub timeout_mins: u64,

    /// Keep every intermediate stop boundary as its own segment instead of
    /// collapsing same-route runs.
    pub detail: bool,
}

impl PlannerConfig {
    /// The search horizon in seconds.
    pub fn horizon_secs(&self) -> u32 {
        self.max_hour * 3600
    }

    /// The scan budget as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_mins * 60)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_hour: 3,
            timeout_mins: 2,
            detail: false,
        }
    }
}
