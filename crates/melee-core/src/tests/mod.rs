//! Test module for determinism and end-to-end combat tests.
//!
//! This module exercises whole battles rather than single components:
//! - **Integration tests**: full combats on reference maps with known
//!   reports, plus round-by-round movement choreography
//! - **Determinism tests**: identical inputs stay byte-identical, round by
//!   round and through serialization
//! - **Helper functions**: map fixtures and battlefield queries
//!
//! # Test Structure
//!
//! - `integration.rs`: end-to-end battles and expected reports
//! - `determinism.rs`: lockstep and replay equivalence
//! - `helpers.rs`: fixtures and setup utilities

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
