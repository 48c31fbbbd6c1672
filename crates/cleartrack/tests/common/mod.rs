//! Shared test utilities for cleartrack integration tests.
//!
//! This module provides:
//! - `TrackerHarness` for running edits against a throwaway SQLite store
//! - Builders for job and container records

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TrackerHarness;
