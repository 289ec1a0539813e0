//! core: ordinal data, probabilities, thresholds, simulation, and options.
//!
//! Purpose
//! -------
//! Collect the building blocks the ordinal models and tests sit on: baseline
//! category probabilities and the logistic cut-points they imply, validated
//! ordinal samples, the latent-logistic simulator, the cumulative-logit
//! parameter mapping, and the option structs for each stage.
//!
//! Conventions
//! -----------
//! - Categories are 1-based (`1..=J`); arrays indexed by category are 0-based.
//! - This module does no logging; orchestration layers above it do.

pub mod data;
pub mod options;
pub mod params;
pub mod probabilities;
pub mod simulation;
pub mod thresholds;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{OrdinalData, Subject};
pub use self::options::{CovarianceKind, FitOptions, SimOpts};
pub use self::params::CumLogitParams;
pub use self::probabilities::CategoryProbabilities;
pub use self::simulation::{OrdinalSimulator, SimDesign, SimulationResult};
pub use self::thresholds::{Thresholds, derive_thresholds};
