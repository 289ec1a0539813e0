//! numerical_stability: guarded logistic-family transforms.
//!
//! Purpose
//! -------
//! Centralize the scalar functions the ordinal likelihoods, simulator, and
//! diagnostics are written in, so every layer evaluates the logistic CDF,
//! its logs, and the softplus reparameterization the same stable way.
//!
//! Key behaviors
//! -------------
//! - `safe_softplus` / `safe_softplus_inv`: the map that keeps fitted
//!   thresholds strictly increasing (`θ_j = θ_{j−1} + softplus(a_j)`).
//! - `safe_logistic`, `logistic_density`, `logit`: CDF, density, quantile.
//! - `log_logistic`, `log_logistic_complement`, `log_logistic_interval`:
//!   log-probabilities of the lowest, highest, and interior categories.
//! - `EIGEN_EPS`: eigenvalue floor for pseudo-inverses in the inference layer.
//!
//! Conventions
//! -----------
//! - Pure functions of `f64`; no allocation, logging, or I/O.
//! - Inputs are assumed finite unless a function documents infinite bounds.
pub mod transformations;

pub use self::transformations::{
    EIGEN_EPS, log_logistic, log_logistic_complement, log_logistic_interval, logistic_density,
    logit, safe_logistic, safe_softplus, safe_softplus_inv,
};
