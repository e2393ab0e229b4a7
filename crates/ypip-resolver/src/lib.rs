//! Dependency resolution engine: identity-keyed dependency graph, conflict
//! detection and reporting, and the breadth-first work-list resolver.

pub mod conflict;
pub mod graph;
pub mod resolver;
