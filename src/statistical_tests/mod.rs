//! statistical_tests: specification tests for fitted ordinal models.
//!
//! Purpose
//! -------
//! Host post-estimation tests that ask whether a fitted cumulative-logit
//! model's assumptions hold. The Brant test of proportional odds lives in
//! [`brant`].
//!
//! Conventions
//! -----------
//! - Tests return statistics, degrees of freedom, and χ² p-values; the
//!   accept/reject decision at a given level belongs to the caller.
//! - Errors use the shared `OrdinalError`.

pub mod brant;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::brant::{PoTestResult, PoTestRow, brant_test};
