//! Cumulative-logit parameters and their optimizer-space mapping.
//!
//! The model is `logit P(Y ≤ j | x) = α_j − β·x` with `α_1 < … < α_{J−1}`.
//! The optimizer works on an unconstrained vector
//!
//! ```text
//! θ = [ τ_1 | a_2 … a_{J−1} | β_1 … β_p ]
//! α_1 = τ_1,   α_k = α_{k−1} + softplus(a_k)
//! ```
//!
//! so every iterate yields strictly increasing intercepts.
use crate::{
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::{safe_logistic, safe_softplus, safe_softplus_inv},
    },
    ordinal::{
        core::validation::validate_thresholds,
        errors::{OrdinalError, OrdinalResult},
    },
};
use ndarray::{Array1, ArrayView1, ArrayViewMut1, s};

/// Model-space parameters of a cumulative-logit model.
#[derive(Debug, Clone, PartialEq)]
pub struct CumLogitParams {
    /// α_j, strictly increasing, length J−1.
    pub intercepts: Array1<f64>,
    /// β, length p.
    pub slopes: Array1<f64>,
}

impl CumLogitParams {
    /// # Errors
    /// - `NonFiniteThreshold` / `ThresholdsNotIncreasing` for bad intercepts.
    pub fn new(intercepts: Array1<f64>, slopes: Array1<f64>) -> OrdinalResult<Self> {
        validate_thresholds(&intercepts.to_vec())?;
        Ok(Self { intercepts, slopes })
    }

    pub fn n_categories(&self) -> usize {
        self.intercepts.len() + 1
    }

    pub fn n_covariates(&self) -> usize {
        self.slopes.len()
    }

    /// Map an optimizer-space θ back to intercepts and slopes.
    ///
    /// # Errors
    /// - `ThetaLengthMismatch` unless `θ.len() == J − 1 + p`.
    pub fn from_theta(
        theta: ArrayView1<f64>, n_categories: usize, n_covariates: usize,
    ) -> OrdinalResult<Self> {
        validate_theta_len(theta, n_categories, n_covariates)?;
        let k = n_categories - 1;
        let mut intercepts = Array1::zeros(k);
        intercepts[0] = theta[0];
        for m in 1..k {
            intercepts[m] = intercepts[m - 1] + safe_softplus(theta[m]);
        }
        let slopes = theta.slice(s![k..]).to_owned();
        Ok(Self { intercepts, slopes })
    }

    /// Inverse of [`from_theta`](Self::from_theta).
    pub fn to_theta(&self) -> Theta {
        let k = self.intercepts.len();
        let mut theta = Array1::zeros(k + self.slopes.len());
        theta[0] = self.intercepts[0];
        for m in 1..k {
            theta[m] = safe_softplus_inv(self.intercepts[m] - self.intercepts[m - 1]);
        }
        theta.slice_mut(s![k..]).assign(&self.slopes);
        theta
    }
}

/// # Errors
/// - `TooFewCategories` for J < 2.
/// - `ThetaLengthMismatch` unless `θ.len() == J − 1 + p`.
pub fn validate_theta_len(
    theta: ArrayView1<f64>, n_categories: usize, n_covariates: usize,
) -> OrdinalResult<()> {
    if n_categories < 2 {
        return Err(OrdinalError::TooFewCategories { found: n_categories });
    }
    let expected = n_categories - 1 + n_covariates;
    if theta.len() != expected {
        return Err(OrdinalError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    Ok(())
}

/// Pull a gradient with respect to the intercepts `α` back to the
/// increments `(τ_1, a_2, …)` in place.
///
/// `∂/∂τ_1 = Σ_k g_k` and `∂/∂a_m = softplus'(a_m) · Σ_{k≥m} g_k`.
pub fn intercept_chain_rule(theta: ArrayView1<f64>, mut grad_alpha: ArrayViewMut1<f64>) {
    let k = grad_alpha.len();
    let mut tail = 0.0;
    for m in (0..k).rev() {
        tail += grad_alpha[m];
        grad_alpha[m] = if m == 0 { tail } else { safe_logistic(theta[m]) * tail };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // `to_theta` and `from_theta` are inverse on valid parameters, and any θ
    // yields increasing intercepts.
    //
    // Given
    // -----
    // - Intercepts (−1, 0.5, 2) and slope 0.7; an arbitrary θ = (3, −9, 4, 0).
    //
    // Expect
    // ------
    // - Round trip within 1e-10; the arbitrary θ maps to increasing α.
    fn theta_mapping_round_trips_and_orders() {
        // Arrange
        let params = CumLogitParams::new(array![-1.0, 0.5, 2.0], array![0.7]).expect("valid");

        // Act
        let back = CumLogitParams::from_theta(params.to_theta().view(), 4, 1).expect("length");
        let wild = CumLogitParams::from_theta(array![3.0, -9.0, 4.0, 0.0].view(), 4, 1)
            .expect("length");

        // Assert
        for (a, b) in back.intercepts.iter().zip(params.intercepts.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(back.slopes[0], 0.7, epsilon = 1e-15);
        assert!(wild.intercepts[1] > wild.intercepts[0]);
        assert!(wild.intercepts[2] > wild.intercepts[1]);
        assert_eq!(
            CumLogitParams::from_theta(array![0.0, 1.0].view(), 4, 1),
            Err(OrdinalError::ThetaLengthMismatch { expected: 4, actual: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // The chain rule matches a finite-difference derivative of a linear
    // functional of α.
    //
    // Given
    // -----
    // - L(θ) = Σ w_k α_k(θ) with w = (0.3, −1.2, 0.8).
    //
    // Expect
    // ------
    // - Pulled-back gradient within 1e-6 of central differences.
    fn intercept_chain_rule_matches_finite_differences() {
        // Arrange
        let w = [0.3, -1.2, 0.8];
        let theta = array![-0.4, 0.2, -1.5];
        let loss = |t: &Array1<f64>| {
            let p = CumLogitParams::from_theta(t.view(), 4, 0).expect("length");
            p.intercepts.iter().zip(w).map(|(a, wk)| a * wk).sum::<f64>()
        };

        // Act
        let mut grad = Array1::from(w.to_vec());
        intercept_chain_rule(theta.view(), grad.view_mut());

        // Assert
        let h = 1e-6;
        for m in 0..3 {
            let mut up = theta.clone();
            let mut dn = theta.clone();
            up[m] += h;
            dn[m] -= h;
            let fd = (loss(&up) - loss(&dn)) / (2.0 * h);
            assert_abs_diff_eq!(grad[m], fd, epsilon = 1e-6);
        }
    }
}
