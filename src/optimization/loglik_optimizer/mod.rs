//! loglik_optimizer: L-BFGS maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Give models a single entry point, [`maximize`], that turns a
//! [`LogLikelihood`] implementation into a configured argmin L-BFGS run and
//! returns a normalized [`OptimOutcome`].
//!
//! Key behaviors
//! -------------
//! - [`traits`]: the `LogLikelihood` trait, `MLEOptions`, `Tolerances`,
//!   `LineSearcher`, and `OptimOutcome`.
//! - [`adapter`]: maps maximization of `ℓ(θ)` onto argmin's minimization of
//!   `-ℓ(θ)`, with a finite-difference gradient fallback.
//! - [`builders`] and [`run`]: solver construction and execution.
//! - [`finite_diff`]: finite-difference gradients and Hessians, reused by the
//!   inference layer for observed information.
//! - [`validation`]: shape and finiteness checks shared by the above.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space; models map them to their
//!   natural parameters themselves.
//! - `OptimOutcome::converged` is strict: an iteration cap is not convergence.
pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};
