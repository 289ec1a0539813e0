//! loglik_optimizer::finite_diff: finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` crate so the rest of the crate can request
//! derivatives without touching its API.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient of a scalar closure with
//!   error capture.
//! - [`compute_hessian`]: Jacobian of a gradient map, central differences
//!   first and forward differences as a fallback, symmetrized in place.
//!
//! Conventions
//! -----------
//! - Closures passed to `finitediff` cannot return `Result`; an error is
//!   parked in a shared `RefCell` and the closure returns `NaN`. Callers
//!   inspect the cell after differencing.
//! - Returned gradients and Hessians always pass [`validate_grad`] /
//!   [`validate_hessian`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// Clears `closure_err` first. If `func` parks an error there during
/// differencing, that error is returned instead of the gradient.
///
/// # Errors
/// - The captured closure error, converted to `OptError`.
/// - `GradientDimMismatch` / `InvalidGradient` from validation.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Jacobian of the gradient map `f` at `theta`.
///
/// `f` is expected to be the gradient of a scalar objective, so the result
/// is that objective's Hessian. Central differences are tried first; if the
/// result fails validation, forward differences are used. The returned
/// matrix is symmetrized by averaging mirrored off-diagonal entries.
///
/// # Errors
/// - `HessianDimMismatch` / `InvalidHessian` if the forward fallback also
///   fails validation (e.g. `f` returns `NaN` near `theta`).
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

// ---- Helper methods ----

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
