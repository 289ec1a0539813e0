//! Cumulative-logit (proportional-odds) model: likelihood, gradient, fit.
//!
//! This module wires `logit P(Y ≤ j | x) = α_j − β·x` to the crate's
//! [`LogLikelihood`] trait and drives the L-BFGS optimizer.
//!
//! Key ideas:
//! - The optimizer sees the **average** log-likelihood `ℓ̄ = (1/n) Σ ℓ_i`,
//!   so the gradient tolerance means the same thing at any sample size.
//! - Intercepts are parameterized by increments,
//!   `α_1 = τ_1`, `α_k = α_{k−1} + softplus(a_k)`, so every iterate is a
//!   valid ordered model (see [`CumLogitParams`]).
//! - The gradient is assembled in natural coordinates by
//!   [`natural_gradient`] and pulled back with [`intercept_chain_rule`].
//! - Standard errors come from the observed information in natural
//!   coordinates, so they are reported for `α` and `β` directly.
//! - A converged optimizer is not enough: separated data drive the
//!   likelihood towards a supremum at infinity, and the average-scale
//!   gradient falls under any tolerance on the way. [`MAX_NEWTON_SHIFT`]
//!   bounds the Newton step left at the reported optimum.
use crate::{
    inference::{
        calc_covariance, iid_score_covariance, pseudo_inverse, smallest_eigenvalue,
        standard_errors,
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, Theta, maximize},
        numerical_stability::EIGEN_EPS,
    },
    ordinal::{
        core::{
            data::OrdinalData,
            options::{CovarianceKind, FitOptions},
            params::{CumLogitParams, intercept_chain_rule, validate_theta_len},
            probabilities::CategoryProbabilities,
            thresholds::derive_thresholds,
        },
        errors::{OrdinalError, OrdinalResult},
        models::{
            fitted::FittedModel,
            model_internals::{
                calculate_scores, expected_information, loglik_sum, natural_gradient,
                natural_vector, params_from_natural,
            },
        },
    },
};
use ndarray::{Array1, Array2, ArrayView1, s};
use tracing::{debug, warn};

/// Largest change, in logits, that one Newton step from a converged optimum
/// may still make to any linear predictor `α_j − x_i·β`.
///
/// At a finite maximum the step is of the order of the gradient tolerance.
/// Along a separating direction the curvature decays as fast as the
/// gradient, and the step stays near one logit however far the optimizer
/// has walked.
pub const MAX_NEWTON_SHIFT: f64 = 0.5;

/// `NonConvergence` status for a likelihood without a finite maximum.
pub const NO_FINITE_MAXIMUM: &str = "NoFiniteMaximum";

/// Cumulative-logit model for J ordered categories and p covariates.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeLogitModel {
    pub n_categories: usize,
    pub n_covariates: usize,
    pub options: FitOptions,
}

impl CumulativeLogitModel {
    /// # Errors
    /// - `TooFewCategories` for J < 2.
    pub fn new(
        n_categories: usize, n_covariates: usize, options: FitOptions,
    ) -> OrdinalResult<Self> {
        if n_categories < 2 {
            return Err(OrdinalError::TooFewCategories { found: n_categories });
        }
        Ok(Self { n_categories, n_covariates, options })
    }

    /// Model sized to `data`.
    pub fn for_data(data: &OrdinalData, options: FitOptions) -> OrdinalResult<Self> {
        Self::new(data.n_categories(), data.n_covariates(), options)
    }

    pub fn n_params(&self) -> usize {
        self.n_categories - 1 + self.n_covariates
    }

    /// Fit by maximum likelihood.
    ///
    /// ## Steps
    /// 1. Check that `data` has this model's J and p.
    /// 2. Start from the thresholds of the observed marginal frequencies and
    ///    `β = 0`. An empty category has no finite MLE and is rejected.
    /// 3. Run L-BFGS per `options.mle`; anything other than solver
    ///    convergence is `NonConvergence`.
    /// 4. Confirm the optimum is finite and identified: the expected
    ///    information must be non-singular and the Newton step from `θ̂` must
    ///    move no linear predictor by more than [`MAX_NEWTON_SHIFT`].
    /// 5. Compute the covariance per `options.covariance`.
    ///
    /// ## Errors
    /// - `CategoryCountMismatch` / `CovariateCountMismatch` for mismatched data.
    /// - `DegenerateCategory` if a category has no observations.
    /// - `NonConvergence` if the optimizer stops without converging, or with
    ///   status [`NO_FINITE_MAXIMUM`] when the data are separated or the
    ///   covariates are collinear with the intercepts or each other.
    /// - `Optimization` for optimizer or Hessian failures.
    pub fn fit(&self, data: &OrdinalData) -> OrdinalResult<FittedModel> {
        self.check_data(data)?;
        let theta0 = self.start_theta(data)?;
        debug!(
            n_obs = data.n_obs(),
            n_categories = self.n_categories,
            n_covariates = self.n_covariates,
            "fitting cumulative-logit model"
        );

        let outcome = maximize(self, theta0, data, &self.options.mle)?;
        if !outcome.converged {
            warn!(
                status = %outcome.status,
                iterations = outcome.iterations,
                "cumulative-logit fit did not converge"
            );
            return Err(OrdinalError::NonConvergence {
                status: outcome.status.clone(),
                iterations: outcome.iterations,
            });
        }

        let params = CumLogitParams::from_theta(
            outcome.theta_hat.view(),
            self.n_categories,
            self.n_covariates,
        )?;
        check_finite_maximum(&params, data, outcome.iterations)?;
        let covariance = self.covariance_matrix(&params, data)?;
        let std_errors = standard_errors(&covariance);
        let loglik = data.n_obs() as f64 * outcome.value;
        debug!(
            loglik,
            iterations = outcome.iterations,
            grad_norm = ?outcome.grad_norm,
            "cumulative-logit fit converged"
        );

        Ok(FittedModel {
            intercepts: params.intercepts,
            slopes: params.slopes,
            covariance,
            std_errors,
            covariance_kind: self.options.covariance,
            loglik,
            n_obs: data.n_obs(),
            n_categories: self.n_categories,
            covariate_names: data.covariate_names().to_vec(),
            optim: outcome,
        })
    }

    /// Covariance of `(α̂, β̂)` at `params`.
    ///
    /// Classical: `J⁺ / n` with `J` the finite-difference Hessian of the
    /// negative average log-likelihood. Robust: `J⁺ S J⁺ / n` with `S` the
    /// IID outer product of per-subject scores.
    ///
    /// # Errors
    /// - `Optimization` if the Hessian is not finite.
    pub fn covariance_matrix(
        &self, params: &CumLogitParams, data: &OrdinalData,
    ) -> OrdinalResult<Array2<f64>> {
        let n = data.n_obs() as f64;
        let k = params.intercepts.len();
        let grad_map = |natural: &Array1<f64>| -> Array1<f64> {
            natural_gradient(&params_from_natural(natural.view(), k), data) / -n
        };
        let score_cov = match self.options.covariance {
            CovarianceKind::Classical => None,
            CovarianceKind::Robust => Some(iid_score_covariance(&calculate_scores(params, data))),
        };
        let cov = calc_covariance(&grad_map, &natural_vector(params), score_cov.as_ref())?;
        Ok(cov / n)
    }

    // ---- Helper methods ----

    fn check_data(&self, data: &OrdinalData) -> OrdinalResult<()> {
        if data.n_categories() != self.n_categories {
            return Err(OrdinalError::CategoryCountMismatch {
                expected: self.n_categories,
                found: data.n_categories(),
            });
        }
        if data.n_covariates() != self.n_covariates {
            return Err(OrdinalError::CovariateCountMismatch {
                expected: self.n_covariates,
                found: data.n_covariates(),
            });
        }
        Ok(())
    }

    fn start_theta(&self, data: &OrdinalData) -> OrdinalResult<Theta> {
        let marginal = CategoryProbabilities::from_counts(&data.category_counts())?;
        let thresholds = derive_thresholds(&marginal)?;
        let params = CumLogitParams::new(
            Array1::from(thresholds.values().to_vec()),
            Array1::zeros(self.n_covariates),
        )?;
        Ok(params.to_theta())
    }
}

/// `NonConvergence` unless `params` is an identified, finite maximum.
fn check_finite_maximum(
    params: &CumLogitParams, data: &OrdinalData, iterations: usize,
) -> OrdinalResult<()> {
    let n = data.n_obs() as f64;
    let info = expected_information(params, data) / n;
    let grad = natural_gradient(params, data) / n;
    let min_eigen = smallest_eigenvalue(&info);
    let step = pseudo_inverse(&info).dot(&grad);
    let shift = max_predictor_shift(step.view(), params.intercepts.len(), data);
    if min_eigen > EIGEN_EPS && shift.is_finite() && shift <= MAX_NEWTON_SHIFT {
        return Ok(());
    }
    warn!(
        min_eigen,
        shift,
        iterations,
        "cumulative-logit likelihood has no finite maximum; check for separation"
    );
    Err(OrdinalError::NonConvergence { status: NO_FINITE_MAXIMUM.to_string(), iterations })
}

/// `max_{i,j} |δα_j − x_i·δβ|` for a natural-coordinate step `δ`.
fn max_predictor_shift(step: ArrayView1<f64>, n_thresholds: usize, data: &OrdinalData) -> f64 {
    if step.iter().any(|v| !v.is_finite()) {
        return f64::INFINITY;
    }
    let d_beta = step.slice(s![n_thresholds..]);
    let (lo, hi) = data
        .x()
        .outer_iter()
        .map(|row| row.dot(&d_beta))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    step.slice(s![..n_thresholds])
        .iter()
        .map(|&a| (a - lo).abs().max((a - hi).abs()))
        .fold(0.0, f64::max)
}

impl LogLikelihood for CumulativeLogitModel {
    type Data = OrdinalData;

    /// Average log-likelihood `ℓ̄(θ)`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params =
            CumLogitParams::from_theta(theta.view(), self.n_categories, self.n_covariates)?;
        Ok(loglik_sum(&params, data) / data.n_obs() as f64)
    }

    /// Length and finiteness of `θ`, and data dimensions.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta_len(theta.view(), self.n_categories, self.n_covariates)?;
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        self.check_data(data)?;
        Ok(())
    }

    /// Analytic `∇ℓ̄(θ)`.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let params =
            CumLogitParams::from_theta(theta.view(), self.n_categories, self.n_covariates)?;
        let mut grad = natural_gradient(&params, data) / data.n_obs() as f64;
        let k = self.n_categories - 1;
        intercept_chain_rule(theta.view(), grad.slice_mut(s![..k]));
        Ok(grad)
    }
}
