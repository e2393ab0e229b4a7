//! Core data types for ypip.
//!
//! This crate defines the version grammar (PEP 440 versions and specifiers),
//! the interpretation of individual requirement lines, and the global
//! configuration.
//!
//! This crate is intentionally free of network I/O.

pub mod config;
pub mod requirement;
pub mod specifier;
pub mod version;
