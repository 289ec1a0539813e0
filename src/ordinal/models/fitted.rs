//! FittedModel: read-only result of a cumulative-logit fit.
//!
//! Purpose
//! -------
//! Hold the estimates, their covariance, and the optimizer outcome of one
//! fit, and answer the questions downstream code asks of them: coefficient
//! tables, predicted probabilities, and information criteria.
//!
//! Conventions
//! -----------
//! - Parameter order everywhere is `(α_1..α_{J−1}, β_1..β_p)`.
//! - Intercepts are labelled `"1|2"`, `"2|3"`, … after the cut they sit on.
//! - `loglik` is the total, not the average the optimizer worked on.
use crate::{
    optimization::{loglik_optimizer::OptimOutcome, numerical_stability::safe_logistic},
    ordinal::{
        core::options::CovarianceKind,
        errors::{OrdinalError, OrdinalResult},
    },
};
use ndarray::{Array1, Array2, s};
use statrs::distribution::{ContinuousCDF, Normal};

/// One row of [`FittedModel::coefficients`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    pub z_value: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub intercepts: Array1<f64>,
    pub slopes: Array1<f64>,
    pub covariance: Array2<f64>,
    pub std_errors: Array1<f64>,
    pub covariance_kind: CovarianceKind,
    pub loglik: f64,
    pub n_obs: usize,
    pub n_categories: usize,
    pub covariate_names: Vec<String>,
    pub optim: OptimOutcome,
}

impl FittedModel {
    pub fn n_covariates(&self) -> usize {
        self.slopes.len()
    }

    pub fn n_params(&self) -> usize {
        self.intercepts.len() + self.slopes.len()
    }

    /// `−2ℓ`.
    pub fn deviance(&self) -> f64 {
        -2.0 * self.loglik
    }

    pub fn aic(&self) -> f64 {
        self.deviance() + 2.0 * self.n_params() as f64
    }

    /// Covariance block of the slopes, `p × p`.
    pub fn slope_covariance(&self) -> Array2<f64> {
        let k = self.intercepts.len();
        self.covariance.slice(s![k.., k..]).to_owned()
    }

    /// Intercepts followed by slopes with Wald z statistics and two-sided
    /// normal p-values.
    ///
    /// # Errors
    /// - `Distribution` if the standard normal cannot be constructed.
    pub fn coefficients(&self) -> OrdinalResult<Vec<CoefficientRow>> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| OrdinalError::Distribution { text: e.to_string() })?;
        let names = (1..self.n_categories)
            .map(|j| format!("{j}|{}", j + 1))
            .chain(self.covariate_names.iter().cloned());
        let estimates = self.intercepts.iter().chain(self.slopes.iter());
        Ok(names
            .zip(estimates)
            .zip(self.std_errors.iter())
            .map(|((term, &estimate), &std_error)| {
                let z_value = estimate / std_error;
                let p_value = 2.0 * (1.0 - normal.cdf(z_value.abs()));
                CoefficientRow { term, estimate, std_error, z_value, p_value }
            })
            .collect())
    }

    /// `P(Y ≤ j | x)` for j = 1..J−1.
    ///
    /// # Errors
    /// - `CovariateCountMismatch` if `x.len() != p`.
    pub fn cumulative_probabilities(&self, x: &[f64]) -> OrdinalResult<Vec<f64>> {
        if x.len() != self.slopes.len() {
            return Err(OrdinalError::CovariateCountMismatch {
                expected: self.slopes.len(),
                found: x.len(),
            });
        }
        let eta: f64 = x.iter().zip(self.slopes.iter()).map(|(a, b)| a * b).sum();
        Ok(self.intercepts.iter().map(|&alpha| safe_logistic(alpha - eta)).collect())
    }

    /// `P(Y = c | x)` for c = 1..J.
    ///
    /// # Errors
    /// - `CovariateCountMismatch` if `x.len() != p`.
    pub fn category_probabilities(&self, x: &[f64]) -> OrdinalResult<Vec<f64>> {
        let cum = self.cumulative_probabilities(x)?;
        let mut out = Vec::with_capacity(self.n_categories);
        let mut prev = 0.0;
        for c in cum {
            out.push(c - prev);
            prev = c;
        }
        out.push(1.0 - prev);
        Ok(out)
    }
}
