//! loglik_optimizer::types: numeric aliases and L-BFGS wiring.
//!
//! Every vector and matrix the optimizer touches is an `ndarray` container
//! over `f64`. The solver aliases pair argmin's L-BFGS with the two
//! supported line searches on these shapes, so the rest of the crate never
//! spells out argmin generics.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector, same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `k × k` Hessian with `k = theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective. Inside argmin this is the cost `-ℓ(θ)`.
pub type Cost = f64;

/// argmin function-evaluation counters keyed by name (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
