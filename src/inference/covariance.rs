//! inference::covariance: observed-information and sandwich covariance.
//!
//! Purpose
//! -------
//! Turn a gradient map of the average log-likelihood into a parameter
//! covariance matrix, classical or robust, and provide the eigen-based
//! pseudoinverse shared with the proportional-odds test.
//!
//! Key behaviors
//! -------------
//! - [`calc_covariance`] differentiates the gradient map with
//!   [`compute_hessian`] to obtain the observed information `J(θ̂)`, then
//!   returns `J⁺` (classical) or `J⁺ S J⁺` (robust, given a score covariance
//!   `S`).
//! - [`pseudo_inverse`] computes a Moore–Penrose inverse of a symmetric
//!   matrix via `nalgebra::SymmetricEigen`, dropping eigenvalues at or below
//!   [`EIGEN_EPS`].
//! - [`smallest_eigenvalue`] reports how close an information matrix is to
//!   singular.
//! - [`standard_errors`] reads square roots off a covariance diagonal.
//!
//! Conventions
//! -----------
//! - All matrices are on the **average** log-likelihood scale; callers
//!   divide by `n` to obtain the covariance of `θ̂` itself.
//! - No explicit inverse is ever formed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Covariance of `θ̂` on the average-log-likelihood scale.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient map of the **negative** average log-likelihood, so that its
///   Jacobian at `theta_hat` is the observed information.
/// - `theta_hat`: `&Array1<f64>`
///   Point at which the information is evaluated.
/// - `scores`: `Option<&Array2<f64>>`
///   Average-score covariance `S`. `None` gives the classical `J⁺`.
///
/// Errors
/// ------
/// - Propagates [`compute_hessian`] failures.
/// - `HessianDimMismatch` when `scores` is not `n × n`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_ordinal::inference::covariance::calc_covariance;
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| a.dot(theta);
/// let cov = calc_covariance(&f, &array![1.0, -1.0], None)?;
/// assert!((cov[[0, 0]] - 0.25).abs() < 1e-6);
/// assert!((cov[[1, 1]] - 1.0).abs() < 1e-6);
/// # Ok::<(), rust_ordinal::optimization::errors::OptError>(())
/// ```
pub fn calc_covariance<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>, scores: Option<&Array2<f64>>,
) -> OptResult<Array2<f64>> {
    let n = theta_hat.len();
    let obs_info = compute_hessian(f, theta_hat)?;
    let bread = pseudo_inverse(&obs_info);
    match scores {
        None => Ok(bread),
        Some(s) => {
            if s.dim() != (n, n) {
                return Err(OptError::HessianDimMismatch { expected: n, found: s.dim() });
            }
            Ok(bread.dot(s).dot(&bread))
        }
    }
}

/// Moore–Penrose pseudoinverse of a symmetric matrix.
///
/// `M⁺ = Σ_{k: λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k`. Directions with
/// non-positive or negligible eigenvalues contribute nothing.
pub fn pseudo_inverse(m: &Array2<f64>) -> Array2<f64> {
    let n = m.nrows();
    let eigen = fill_dmatrix(m).symmetric_eigen();
    let q = eigen.eigenvectors;
    let mut out = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        for i in 0..n {
            let coeff = q[(i, k)] / lambda;
            for j in 0..n {
                out[[i, j]] += coeff * q[(j, k)];
            }
        }
    }
    out
}

/// Smallest eigenvalue of a symmetric matrix; `+∞` for an empty one.
pub fn smallest_eigenvalue(m: &Array2<f64>) -> f64 {
    fill_dmatrix(m).symmetric_eigenvalues().iter().copied().fold(f64::INFINITY, f64::min)
}

/// Square roots of the diagonal; tiny negative round-off is clamped to zero.
pub fn standard_errors(cov: &Array2<f64>) -> Array1<f64> {
    cov.diag().mapv(|v| v.max(0.0).sqrt())
}

// ---- Helper methods ----

/// Copy a square `ndarray` matrix into a column-major `DMatrix`.
fn fill_dmatrix(m: &Array2<f64>) -> DMatrix<f64> {
    let n = m.ncols();
    let mut out = DMatrix::<f64>::zeros(m.nrows(), n);
    for j in 0..n {
        for i in 0..m.nrows() {
            out[(i, j)] = m[[i, j]];
        }
    }
    out
}
