//! Timetable construction and caching.

mod builder;
mod cache;

pub use builder::{
    resolve_ignored_routes, Timetable, TimetableBuilder, TimetableFilters, WalkEdge, WalkParams,
    WalkTables,
};
pub use cache::{TimetableCache, TimetableCacheConfig, TimetableKey};
