//! Configuration for fitting and simulation.
//!
//! Purpose
//! -------
//! Bundle the knobs of each pipeline stage into small option structs with
//! validating constructors and sensible `Default`s, in the same shape as the
//! optimizer's own [`MLEOptions`].
//!
//! Key behaviors
//! -------------
//! - [`FitOptions`]: optimizer settings plus the covariance estimator used
//!   for standard errors.
//! - [`SimOpts`]: sample size, exposure allocation, seed, and whether to
//!   keep the latent draws.
use crate::{
    optimization::loglik_optimizer::MLEOptions,
    ordinal::{
        core::validation::validate_exposure_ratio,
        errors::{OrdinalError, OrdinalResult},
    },
};
use std::str::FromStr;

/// Covariance estimator for fitted coefficients.
///
/// - `Classical`: inverse observed information.
/// - `Robust`: sandwich `J⁻¹ S J⁻¹` with the outer product of per-subject
///   scores as `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CovarianceKind {
    #[default]
    Classical,
    Robust,
}

impl FromStr for CovarianceKind {
    type Err = OrdinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classical" => Ok(CovarianceKind::Classical),
            "robust" | "sandwich" => Ok(CovarianceKind::Robust),
            _ => Err(OrdinalError::InvalidCovarianceKind { name: s.to_string() }),
        }
    }
}

/// Options for [`CumulativeLogitModel`](crate::ordinal::models::CumulativeLogitModel).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitOptions {
    pub mle: MLEOptions,
    pub covariance: CovarianceKind,
}

impl FitOptions {
    pub fn new(mle: MLEOptions, covariance: CovarianceKind) -> Self {
        Self { mle, covariance }
    }
}

/// Options for [`OrdinalSimulator`](crate::ordinal::core::simulation::OrdinalSimulator).
///
/// Fields
/// ------
/// - `n_subjects`: sample size (> 0).
/// - `exposure_ratio`: probability a subject is exposed, in (0, 1).
/// - `seed`: `Some(s)` for a reproducible `StdRng`; `None` draws OS entropy.
/// - `return_latent`: keep the latent logistic draws in the result.
///
/// Default: 25,000 subjects, ratio 0.5, seed `Some(42)`, no latent draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOpts {
    pub n_subjects: usize,
    pub exposure_ratio: f64,
    pub seed: Option<u64>,
    pub return_latent: bool,
}

impl SimOpts {
    /// # Errors
    /// - `EmptyData` for zero subjects.
    /// - `InvalidExposureRatio` outside (0, 1).
    pub fn new(
        n_subjects: usize, exposure_ratio: f64, seed: Option<u64>, return_latent: bool,
    ) -> OrdinalResult<Self> {
        if n_subjects == 0 {
            return Err(OrdinalError::EmptyData);
        }
        validate_exposure_ratio(exposure_ratio)?;
        Ok(Self { n_subjects, exposure_ratio, seed, return_latent })
    }
}

impl Default for SimOpts {
    fn default() -> Self {
        Self { n_subjects: 25_000, exposure_ratio: 0.5, seed: Some(42), return_latent: false }
    }
}
