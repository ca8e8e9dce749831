//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::planner::PlannerConfig;
use crate::snapshot::SnapshotData;
use crate::timetable::{TimetableCache, TimetableCacheConfig, WalkParams, WalkTables};

/// Server-level configuration applied to every request.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Exclusion keys ignored on every request, on top of the request's
    /// own list.
    pub base_ignored_lines: Vec<String>,

    /// Operator-supplied walking tables.
    pub walk_tables: WalkTables,

    /// Walking augmentation parameters.
    pub walk_params: WalkParams,

    /// Journey planner parameters.
    pub planner: PlannerConfig,
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_ignored_lines(mut self, keys: Vec<String>) -> Self {
        self.base_ignored_lines = keys;
        self
    }

    pub fn with_walk_tables(mut self, tables: WalkTables) -> Self {
        self.walk_tables = tables;
        self
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The current snapshot. A refresh builds a whole new [`SnapshotData`]
    /// and swaps it in; in-flight requests keep the one they cloned.
    pub snapshot: Arc<RwLock<SnapshotData>>,

    /// Cache of built timetables, keyed by filter set and snapshot versions.
    pub timetables: Arc<TimetableCache>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        snapshot: SnapshotData,
        cache_config: &TimetableCacheConfig,
        config: ServerConfig,
    ) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            timetables: Arc::new(TimetableCache::new(cache_config)),
            config: Arc::new(config),
        }
    }
}
