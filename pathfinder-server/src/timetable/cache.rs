//! Caching of built timetables.
//!
//! A timetable is a pure function of (snapshot versions, filter set), so the
//! cache key carries both: when the snapshot files' modification times
//! advance, stale entries simply stop being hit and age out.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{RouteId, StationId};

use super::builder::{Timetable, TimetableFilters};

/// Cache key: every input the builder's output depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimetableKey {
    ignored_routes: Vec<RouteId>,
    include_high_speed: bool,
    include_boats: bool,
    only_light_rail: bool,
    walking_wild: bool,
    avoid_stations: Vec<StationId>,
    network_version: String,
    departures_version: String,
}

impl TimetableKey {
    /// Build a key from a filter set and the snapshot version tags.
    pub fn new(
        filters: &TimetableFilters,
        network_version: &str,
        departures_version: &str,
    ) -> Self {
        Self {
            ignored_routes: filters.ignored_routes.iter().cloned().collect(),
            include_high_speed: filters.include_high_speed,
            include_boats: filters.include_boats,
            only_light_rail: filters.only_light_rail,
            walking_wild: filters.walking_wild,
            avoid_stations: filters.avoid_stations.iter().cloned().collect(),
            network_version: network_version.to_string(),
            departures_version: departures_version.to_string(),
        }
    }
}

/// Configuration for the timetable cache.
#[derive(Debug, Clone)]
pub struct TimetableCacheConfig {
    /// TTL for cached timetables.
    pub ttl: Duration,
    /// Maximum number of cached timetables (distinct filter sets).
    pub max_capacity: u64,
}

impl Default for TimetableCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 32,
        }
    }
}

/// Cache of built timetables.
pub struct TimetableCache {
    inner: MokaCache<TimetableKey, Arc<Timetable>>,
}

impl TimetableCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &TimetableCacheConfig) -> Self {
        let inner = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        Self { inner }
    }

    /// Get a cached timetable.
    pub async fn get(&self, key: &TimetableKey) -> Option<Arc<Timetable>> {
        self.inner.get(key).await
    }

    /// Insert a freshly built timetable.
    pub async fn insert(&self, key: TimetableKey, timetable: Arc<Timetable>) {
        self.inner.insert(key, timetable).await;
    }

    /// Number of cached timetables (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
