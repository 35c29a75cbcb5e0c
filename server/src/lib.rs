//! Bootstrap library for the task tracker binary.
//!
//! Exposed as a library so integration tests can drive configuration
//! loading, context assembly, and the serve lifecycle without spawning the
//! binary.

pub mod config;
pub mod setup;
pub mod telemetry;
