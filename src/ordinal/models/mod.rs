//! models: the cumulative-logit model, its fitted result, and internals.
//!
//! - [`CumulativeLogitModel`] implements the crate's `LogLikelihood` on the
//!   average log-likelihood and fits by L-BFGS.
//! - [`FittedModel`] is the read-only result: estimates, covariance,
//!   coefficient table, and predictions.
//! - [`model_internals`] holds the per-subject traversal shared by the
//!   likelihood, gradient, and score computations.

pub mod cumulative_logit;
pub mod fitted;
pub mod model_internals;

pub use self::cumulative_logit::CumulativeLogitModel;
pub use self::fitted::{CoefficientRow, FittedModel};
pub use self::model_internals::calculate_scores;
