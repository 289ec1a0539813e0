//! loglik_optimizer::builders: L-BFGS solver construction.
//!
//! The builders apply the memory size and stopping tolerances from
//! [`MLEOptions`]. Initial parameters and the iteration cap are runtime
//! concerns applied by [`run_lbfgs`](super::run::run_lbfgs).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// - `OptError` when argmin rejects a configured tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// Construct L-BFGS with a More–Thuente line search.
///
/// # Errors
/// - `OptError` when argmin rejects a configured tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply optional gradient and cost-change tolerances to any L-BFGS variant.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Both builders succeed for default and explicit memory sizes, and
    // `configure_lbfgs` accepts present or absent tolerances.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both builders construct a solver from the default options.
    //
    // Given
    // -----
    // - `MLEOptions::default()` (memory `None`).
    //
    // Expect
    // ------
    // - Both builders return `Ok`.
    fn builders_accept_default_options() {
        let opts = MLEOptions::default();
        assert!(build_optimizer_more_thuente(&opts).is_ok());
        assert!(build_optimizer_hager_zhang(&opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` applies a cost tolerance alongside the gradient one
    // and also works with neither set.
    //
    // Given
    // -----
    // - Options with `(1e-6, 1e-10, 100)` and options with `(None, None, 100)`.
    //
    // Expect
    // ------
    // - Both configurations return `Ok`.
    fn configure_lbfgs_handles_present_and_absent_tolerances() {
        // Arrange
        let both = Tolerances::new(Some(1e-6), Some(1e-10), Some(100)).expect("valid");
        let neither = Tolerances::new(None, None, Some(100)).expect("valid");
        let opts_both = MLEOptions::new(both, LineSearcher::HagerZhang, false, Some(11))
            .expect("valid options");
        let opts_neither =
            MLEOptions::new(neither, LineSearcher::MoreThuente, false, None).expect("valid");

        // Act
        let a = configure_lbfgs(LBFGS::new(HagerZhangLS::new(), 11), &opts_both);
        let b = configure_lbfgs(LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM), &opts_neither);

        // Assert
        assert!(a.is_ok());
        assert!(b.is_ok());
    }
}
