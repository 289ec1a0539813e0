//! inference: covariance estimation for fitted models.
//!
//! Purpose
//! -------
//! Convert a fitted model's gradient map and per-observation scores into a
//! parameter covariance matrix, classical (inverse observed information)
//! or robust (sandwich with an IID score covariance).
//!
//! Conventions
//! -----------
//! - Inputs and outputs live on the average log-likelihood scale.
//! - Functions are pure: no logging and no global state.

pub mod covariance;
pub mod scores;

pub use self::covariance::{calc_covariance, pseudo_inverse, smallest_eigenvalue, standard_errors};
pub use self::scores::iid_score_covariance;
