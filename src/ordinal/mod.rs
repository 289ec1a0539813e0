//! ordinal: cumulative-logit modelling of ordered categorical outcomes.
//!
//! Purpose
//! -------
//! Bundle the ordinal stack under one namespace: category probabilities and
//! the logistic thresholds they imply, the latent-logistic simulator, the
//! cumulative-logit model and its fitted result, plot-feeding diagnostics,
//! and the shared [`OrdinalError`] type.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`CategoryProbabilities`] and derive [`Thresholds`].
//! 2. Simulate an [`OrdinalData`] sample with [`OrdinalSimulator`], or build
//!    one from observed [`Subject`]s.
//! 3. Fit a [`CumulativeLogitModel`] to obtain a [`FittedModel`].
//! 4. Test proportional odds with `statistical_tests::brant_test`.

pub mod core;
pub mod diagnostics;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CategoryProbabilities, CovarianceKind, FitOptions, OrdinalData, OrdinalSimulator, SimDesign,
    SimOpts, SimulationResult, Subject, Thresholds, derive_thresholds,
};
pub use self::errors::{OrdinalError, OrdinalResult};
pub use self::models::{CoefficientRow, CumulativeLogitModel, FittedModel};
