//! Shared utilities for the grava resolution engine.
//!
//! This crate provides cross-cutting concerns used by the other grava crates:
//! the unified error type and the deprecation-reporting sink for legacy
//! configuration APIs.

pub mod deprecation;
pub mod errors;
