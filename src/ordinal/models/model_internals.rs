//! Cumulative-logit model internals: observation traversal and scores.
//!
//! Purpose
//! -------
//! Evaluate the per-subject pieces of the cumulative-logit likelihood once,
//! in one place, and let the likelihood, gradient, score, and covariance
//! routines consume them through [`walk_observations`].
//!
//! Key behaviors
//! -------------
//! - [`walk_observations`] visits each subject with its linear predictor,
//!   interval log-probability, and the two density ratios that drive every
//!   derivative.
//! - [`loglik_sum`] and [`natural_gradient`] give `Σ ℓ_i` and its gradient
//!   in the natural coordinates `(α_1..α_{J−1}, β_1..β_p)`.
//! - [`calculate_scores`] builds the `n × (J−1+p)` per-subject score matrix
//!   in the same coordinates.
//! - [`expected_information`] sums the Fisher information over every
//!   category a subject could fall in, not only the observed one.
//!
//! Invariants & assumptions
//! ------------------------
//! - Subject `i` in category `c` contributes
//!   `ℓ_i = ln(F(α_c − η_i) − F(α_{c−1} − η_i))`, with `α_0 = −∞`,
//!   `α_J = +∞`, `η_i = x_i·β`, and `F` the standard logistic CDF.
//! - Data dimensions match `params`; callers validate them up front.
//!
//! Conventions
//! -----------
//! - `d_upper = f(a)/P` and `d_lower = f(b)/P` with `a`, `b` the upper and
//!   lower bounds and `P` the interval probability. The open-ended
//!   categories use the closed forms `1 − F(a)` and `F(b)`.
use crate::{
    optimization::numerical_stability::{log_logistic_interval, logistic_density, safe_logistic},
    ordinal::core::{data::OrdinalData, params::CumLogitParams},
};
use ndarray::{Array1, Array2, ArrayView1, s};

/// One subject's contribution to the likelihood and its derivatives.
#[derive(Debug, Clone, Copy)]
pub struct ObsEntry<'a> {
    pub idx: usize,
    pub category: usize,
    pub x_row: ArrayView1<'a, f64>,
    pub loglik: f64,
    pub d_upper: f64,
    pub d_lower: f64,
}

/// Visit every subject with its likelihood pieces evaluated at `params`.
pub fn walk_observations<State, Step>(
    params: &CumLogitParams, data: &OrdinalData, state: &mut State, mut step: Step,
) where
    Step: FnMut(ObsEntry<'_>, &mut State),
{
    let alpha = &params.intercepts;
    let n_categories = alpha.len() + 1;
    for (idx, (x_row, &category)) in data.x().outer_iter().zip(data.y().iter()).enumerate() {
        let eta = x_row.dot(&params.slopes);
        let upper = if category < n_categories { alpha[category - 1] - eta } else { f64::INFINITY };
        let lower = if category > 1 { alpha[category - 2] - eta } else { f64::NEG_INFINITY };
        let loglik = log_logistic_interval(upper, lower);
        let (d_upper, d_lower) = match (category == 1, category == n_categories) {
            (true, _) => (safe_logistic(-upper), 0.0),
            (_, true) => (0.0, safe_logistic(lower)),
            _ => {
                let prob = loglik.exp();
                (logistic_density(upper) / prob, logistic_density(lower) / prob)
            }
        };
        step(ObsEntry { idx, category, x_row, loglik, d_upper, d_lower }, state);
    }
}

/// `Σ_i ℓ_i` at `params`.
pub fn loglik_sum(params: &CumLogitParams, data: &OrdinalData) -> f64 {
    let mut total = 0.0;
    walk_observations(params, data, &mut total, |entry, acc| *acc += entry.loglik);
    total
}

/// Gradient of `Σ_i ℓ_i` in natural coordinates `(α, β)`.
pub fn natural_gradient(params: &CumLogitParams, data: &OrdinalData) -> Array1<f64> {
    let k = params.intercepts.len();
    let mut grad = Array1::<f64>::zeros(k + params.slopes.len());
    walk_observations(params, data, &mut grad, |entry, acc| {
        add_score(entry, k, acc.view_mut());
    });
    grad
}

/// Per-subject scores `∂ℓ_i/∂(α, β)`, one row per subject.
pub fn calculate_scores(params: &CumLogitParams, data: &OrdinalData) -> Array2<f64> {
    let k = params.intercepts.len();
    let mut scores = Array2::<f64>::zeros((data.n_obs(), k + params.slopes.len()));
    walk_observations(params, data, &mut scores, |entry, acc| {
        add_score(entry, k, acc.row_mut(entry.idx));
    });
    scores
}

/// Split a natural-coordinate vector back into intercepts and slopes
/// without the ordering check; finite-difference steps may nudge it.
pub fn params_from_natural(natural: ArrayView1<f64>, n_thresholds: usize) -> CumLogitParams {
    CumLogitParams {
        intercepts: natural.slice(s![..n_thresholds]).to_owned(),
        slopes: natural.slice(s![n_thresholds..]).to_owned(),
    }
}

/// Stack `(α, β)` into one natural-coordinate vector.
pub fn natural_vector(params: &CumLogitParams) -> Array1<f64> {
    let k = params.intercepts.len();
    let mut out = Array1::zeros(k + params.slopes.len());
    out.slice_mut(s![..k]).assign(&params.intercepts);
    out.slice_mut(s![k..]).assign(&params.slopes);
    out
}

/// Fisher information `Σ_i Σ_c ∇P_ic ∇P_icᵀ / P_ic` in natural coordinates.
///
/// Unlike a finite-difference Hessian this stays accurate when some `P_ic`
/// are exponentially small, so directions of vanishing curvature keep their
/// true (tiny) eigenvalues. Categories whose probability underflows to zero
/// are skipped.
pub fn expected_information(params: &CumLogitParams, data: &OrdinalData) -> Array2<f64> {
    let alpha = &params.intercepts;
    let k = alpha.len();
    let dim = k + params.slopes.len();
    let mut info = Array2::<f64>::zeros((dim, dim));
    let mut d_prob = Array1::<f64>::zeros(dim);
    for x_row in data.x().outer_iter() {
        let eta = x_row.dot(&params.slopes);
        for c in 1..=k + 1 {
            let upper = if c <= k { alpha[c - 1] - eta } else { f64::INFINITY };
            let lower = if c >= 2 { alpha[c - 2] - eta } else { f64::NEG_INFINITY };
            let prob = log_logistic_interval(upper, lower).exp();
            if prob <= 0.0 {
                continue;
            }
            let f_upper = if c <= k { logistic_density(upper) } else { 0.0 };
            let f_lower = if c >= 2 { logistic_density(lower) } else { 0.0 };
            d_prob.fill(0.0);
            if c <= k {
                d_prob[c - 1] = f_upper;
            }
            if c >= 2 {
                d_prob[c - 2] -= f_lower;
            }
            d_prob.slice_mut(s![k..]).scaled_add(f_lower - f_upper, &x_row);
            for i in 0..dim {
                let scaled = d_prob[i] / prob;
                if scaled == 0.0 {
                    continue;
                }
                for j in 0..dim {
                    info[[i, j]] += scaled * d_prob[j];
                }
            }
        }
    }
    info
}

// ---- Helper methods ----

fn add_score(entry: ObsEntry<'_>, k: usize, mut target: ndarray::ArrayViewMut1<'_, f64>) {
    let c = entry.category;
    if c <= k {
        target[c - 1] += entry.d_upper;
    }
    if c >= 2 {
        target[c - 2] -= entry.d_lower;
    }
    let w = entry.d_upper - entry.d_lower;
    target.slice_mut(s![k..]).scaled_add(-w, &entry.x_row);
}
