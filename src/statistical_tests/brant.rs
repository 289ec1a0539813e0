//! statistical_tests::brant: Brant Wald test of proportional odds.
//!
//! Purpose
//! -------
//! Test whether the slopes of a cumulative-logit model are equal across its
//! J−1 cut-points. Each cut `Y ≤ j` is fitted as its own binary logistic
//! regression; under proportional odds all J−1 slope vectors estimate the
//! same β, and a Wald statistic measures how far apart they are.
//!
//! Key behaviors
//! -------------
//! - Fit the binary split `I(Y ≤ j)` for each j with the same fitter (J = 2),
//!   so the binary slopes share the cumulative-logit sign convention.
//! - Build the joint covariance of the stacked binary estimates from the
//!   fitted probabilities `π_ij = P̂(Y > j | x_i)`:
//!   `V_jj = (X̃ᵀ W_jj X̃)⁻¹`, `W_jj = π_j(1 − π_j)`, and for j < l
//!   `V_jl = V_jj X̃ᵀ W_jl X̃ V_ll`, `W_jl = π_l − π_j π_l`, with `X̃ = [1, X]`.
//! - Contrast `β_1 − β_k` for k = 2..J−1 and report an omnibus χ² on
//!   `(J−2)·p` degrees of freedom plus one χ² per covariate on `J−2`.
//!
//! Invariants & assumptions
//! ------------------------
//! - J ≥ 3; with two categories there is nothing to compare.
//! - The contrast covariance is inverted with an eigen pseudoinverse, so a
//!   singular matrix lowers the effective rank instead of failing.
//!
//! Conventions
//! -----------
//! - `p_value = 1 − F_χ²(statistic)` via `statrs`.
//! - The decision at a significance level is left to the caller.
use crate::{
    inference::pseudo_inverse,
    optimization::numerical_stability::safe_logistic,
    ordinal::{
        core::{data::OrdinalData, options::FitOptions},
        errors::{OrdinalError, OrdinalResult},
        models::{CumulativeLogitModel, FittedModel},
    },
};
use ndarray::{Array1, Array2, Axis, s};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::debug;

/// One line of the test table: a covariate or the omnibus row.
#[derive(Debug, Clone, PartialEq)]
pub struct PoTestRow {
    pub term: String,
    pub statistic: f64,
    pub df: usize,
    pub p_value: f64,
}

/// Outcome of [`brant_test`].
///
/// Fields
/// ------
/// - `rows`: one row per covariate, in covariate order.
/// - `omnibus`: joint test over all covariates.
/// - `binary_fits`: the J−1 per-cut binary fits, cut `j` at index `j − 1`.
/// - `binary_slopes`: `(J−1) × p` matrix of their slopes.
/// - `po_slopes`: slopes of the proportional-odds fit under test.
#[derive(Debug, Clone, PartialEq)]
pub struct PoTestResult {
    pub rows: Vec<PoTestRow>,
    pub omnibus: PoTestRow,
    pub binary_fits: Vec<FittedModel>,
    pub binary_slopes: Array2<f64>,
    pub po_slopes: Array1<f64>,
}

impl PoTestResult {
    /// Row for a named covariate.
    pub fn row(&self, term: &str) -> Option<&PoTestRow> {
        self.rows.iter().find(|r| r.term == term)
    }
}

/// Brant test of the proportional-odds assumption for `model` on `data`.
///
/// Parameters
/// ----------
/// - `model`: `&FittedModel`
///   Proportional-odds fit to `data`; reported alongside the binary slopes.
/// - `data`: `&OrdinalData`
///   The sample the model was fitted to.
/// - `options`: `&FitOptions`
///   Optimizer settings for the binary fits.
///
/// Errors
/// ------
/// - `TestRequiresThreeCategories` for J < 3.
/// - `CategoryCountMismatch` / `CovariateCountMismatch` if `model` and
///   `data` disagree.
/// - Any fitting error of a binary split, e.g. `DegenerateCategory` when a
///   side of a cut is empty or `NonConvergence`.
/// - `Distribution` if a χ² reference cannot be built.
pub fn brant_test(
    model: &FittedModel, data: &OrdinalData, options: &FitOptions,
) -> OrdinalResult<PoTestResult> {
    let n_categories = data.n_categories();
    if n_categories < 3 {
        return Err(OrdinalError::TestRequiresThreeCategories { found: n_categories });
    }
    if model.n_categories != n_categories {
        return Err(OrdinalError::CategoryCountMismatch {
            expected: model.n_categories,
            found: n_categories,
        });
    }
    let p = data.n_covariates();
    if model.n_covariates() != p {
        return Err(OrdinalError::CovariateCountMismatch {
            expected: model.n_covariates(),
            found: p,
        });
    }

    let n_cuts = n_categories - 1;
    let mut binary_fits = Vec::with_capacity(n_cuts);
    for j in 1..=n_cuts {
        let split = data.binary_split(j)?;
        let fit = CumulativeLogitModel::for_data(&split, options.clone())?.fit(&split)?;
        debug!(cut = j, slopes = ?fit.slopes.to_vec(), "binary fit for cut");
        binary_fits.push(fit);
    }

    let x_tilde = design_with_intercept(data.x());
    let probs: Vec<Array1<f64>> =
        binary_fits.iter().map(|fit| upper_probabilities(fit, data.x())).collect();
    let joint = joint_slope_covariance(&x_tilde, &probs);

    let mut binary_slopes = Array2::<f64>::zeros((n_cuts, p));
    for (j, fit) in binary_fits.iter().enumerate() {
        binary_slopes.row_mut(j).assign(&fit.slopes);
    }
    let stacked = Array1::from_iter(binary_slopes.iter().copied());

    let all: Vec<usize> = (0..p).collect();
    let omnibus = wald_row("omnibus", &stacked, &joint, &all, n_cuts, p)?;
    let rows = data
        .covariate_names()
        .iter()
        .enumerate()
        .map(|(c, name)| wald_row(name, &stacked, &joint, &[c], n_cuts, p))
        .collect::<OrdinalResult<Vec<_>>>()?;
    debug!(statistic = omnibus.statistic, p_value = omnibus.p_value, "Brant omnibus");

    Ok(PoTestResult {
        rows,
        omnibus,
        binary_fits,
        binary_slopes,
        po_slopes: model.slopes.clone(),
    })
}

// ---- Helper methods ----

/// `[1, X]`.
fn design_with_intercept(x: &Array2<f64>) -> Array2<f64> {
    let mut out = Array2::<f64>::ones((x.nrows(), x.ncols() + 1));
    out.slice_mut(s![.., 1..]).assign(x);
    out
}

/// `π_i = P̂(Y > j | x_i) = 1 − F(α − x_i·β)` for a binary fit.
fn upper_probabilities(fit: &FittedModel, x: &Array2<f64>) -> Array1<f64> {
    let alpha = fit.intercepts[0];
    x.dot(&fit.slopes).mapv(|eta| safe_logistic(eta - alpha))
}

/// `X̃ᵀ diag(w) X̃`.
fn weighted_cross_product(x_tilde: &Array2<f64>, w: &Array1<f64>) -> Array2<f64> {
    let weighted = x_tilde * &w.view().insert_axis(Axis(1));
    x_tilde.t().dot(&weighted)
}

/// Covariance of the stacked binary slopes `(β_1, …, β_{J−1})`, each of
/// length p, laid out cut-major.
fn joint_slope_covariance(x_tilde: &Array2<f64>, probs: &[Array1<f64>]) -> Array2<f64> {
    let n_cuts = probs.len();
    let p = x_tilde.ncols() - 1;
    let v_diag: Vec<Array2<f64>> = probs
        .iter()
        .map(|pi| pseudo_inverse(&weighted_cross_product(x_tilde, &pi.mapv(|v| v * (1.0 - v)))))
        .collect();

    let mut joint = Array2::<f64>::zeros((n_cuts * p, n_cuts * p));
    for j in 0..n_cuts {
        for l in j..n_cuts {
            let block = if j == l {
                v_diag[j].clone()
            } else {
                let w = &probs[l] - &(&probs[j] * &probs[l]);
                v_diag[j].dot(&weighted_cross_product(x_tilde, &w)).dot(&v_diag[l])
            };
            let slopes = block.slice(s![1.., 1..]);
            joint.slice_mut(s![j * p..(j + 1) * p, l * p..(l + 1) * p]).assign(&slopes);
            joint.slice_mut(s![l * p..(l + 1) * p, j * p..(j + 1) * p]).assign(&slopes.t());
        }
    }
    joint
}

/// Wald χ² for `β_1 − β_k = 0`, k = 2..J−1, restricted to `covariates`.
fn wald_row(
    term: &str, stacked: &Array1<f64>, joint: &Array2<f64>, covariates: &[usize], n_cuts: usize,
    p: usize,
) -> OrdinalResult<PoTestRow> {
    let n_contrasts = (n_cuts - 1) * covariates.len();
    let mut d = Array2::<f64>::zeros((n_contrasts, n_cuts * p));
    let mut row = 0;
    for k in 1..n_cuts {
        for &c in covariates {
            d[[row, c]] = 1.0;
            d[[row, k * p + c]] = -1.0;
            row += 1;
        }
    }
    let diff = d.dot(stacked);
    let middle = pseudo_inverse(&d.dot(joint).dot(&d.t()));
    let statistic = diff.dot(&middle.dot(&diff)).max(0.0);
    let df = n_contrasts;
    let chi2 = ChiSquared::new(df as f64)
        .map_err(|e| OrdinalError::Distribution { text: e.to_string() })?;
    Ok(PoTestRow { term: term.to_string(), statistic, df, p_value: 1.0 - chi2.cdf(statistic) })
}
