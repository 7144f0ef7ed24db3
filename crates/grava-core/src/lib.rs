//! Core value types for the grava resolution engine.
//!
//! This crate defines the leaf types the policy engine is built from:
//! module coordinates and version selectors with their shorthand notation,
//! dependency requests threaded through substitution rules, and normalized
//! cache durations.
//!
//! This crate is intentionally free of policy logic and I/O.

pub mod module;
pub mod request;
pub mod time;
