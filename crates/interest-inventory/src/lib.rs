//! Validation and scoring engine for a six-category interest inventory, with the
//! configuration, telemetry, and persistence plumbing needed to host it.

pub mod config;
pub mod error;
pub mod inventory;
pub mod telemetry;
