//! Transit journey planner server for Minecraft Transit Railway maps.
//!
//! Answers "how do I get from station A to station B, leaving now?" over a
//! map server's published network and departure data, using an
//! earliest-arrival connection scan.

pub mod domain;
pub mod planner;
pub mod snapshot;
pub mod timetable;
pub mod web;
