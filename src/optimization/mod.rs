//! optimization: generic maximum-likelihood machinery.
//!
//! Purpose
//! -------
//! Hold everything the ordinal models need from numerical optimization but
//! that knows nothing about ordinal data: the L-BFGS driver
//! ([`loglik_optimizer`]), its error type ([`errors`]), and the stable
//! scalar transforms the likelihoods are written in
//! ([`numerical_stability`]).
//!
//! Conventions
//! -----------
//! - This layer never logs except for the optional optimizer trace enabled
//!   by `MLEOptions::verbose`.
//! - Errors are [`errors::OptError`]; the ordinal layer wraps them.
pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;
