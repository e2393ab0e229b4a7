//! Shared utilities for ypip.
//!
//! This crate provides cross-cutting concerns used by all other ypip crates:
//! the unified error type, filesystem helpers, and terminal status lines
//! and progress indicators.

pub mod errors;
pub mod fs;
pub mod progress;
