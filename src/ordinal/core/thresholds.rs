//! Thresholds: cut-points of the latent standard-logistic scale.
//!
//! Purpose
//! -------
//! Convert baseline category probabilities into the J−1 cut-points that
//! partition a standard logistic density into J segments whose areas are
//! exactly those probabilities, and expose the reverse maps used by the
//! simulator, the fitter's starting values, and plotting consumers.
//!
//! Key behaviors
//! -------------
//! - [`derive_thresholds`]: `threshold[i] = ln(Σ_{k≤i} p_k / Σ_{k>i} p_k)`.
//! - [`Thresholds::cumulative_probabilities`]: logistic CDF at each cut.
//! - [`Thresholds::segment_probabilities`]: area of each segment, the data
//!   behind a density-partition plot.
//! - [`Thresholds::shifted`]: thresholds after a uniform shift, as seen by a
//!   subject with a non-zero linear predictor.
//!
//! Conventions
//! -----------
//! - The upper tail mass is summed directly instead of taken as `1 − cum`,
//!   so thresholds near the upper end keep full precision.
use crate::{
    optimization::numerical_stability::safe_logistic,
    ordinal::{
        core::{probabilities::CategoryProbabilities, validation::validate_thresholds},
        errors::OrdinalResult,
    },
};

/// Strictly increasing cut-points on the latent logistic scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    values: Vec<f64>,
}

impl Thresholds {
    /// Wrap cut-points after checking they are finite and strictly increasing.
    pub fn new(values: Vec<f64>) -> OrdinalResult<Self> {
        validate_thresholds(&values)?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of categories the cut-points separate (`len + 1`).
    pub fn n_categories(&self) -> usize {
        self.values.len() + 1
    }

    /// `P(Y ≤ j)` at each cut, j = 1..J−1.
    pub fn cumulative_probabilities(&self) -> Vec<f64> {
        self.values.iter().map(|&t| safe_logistic(t)).collect()
    }

    /// Area of each of the J segments of the standard logistic density.
    pub fn segment_probabilities(&self) -> Vec<f64> {
        let cum = self.cumulative_probabilities();
        let mut out = Vec::with_capacity(self.n_categories());
        let mut prev = 0.0;
        for c in cum {
            out.push(c - prev);
            prev = c;
        }
        out.push(1.0 - prev);
        out
    }

    /// Cut-points shifted by `delta`. Order is preserved.
    pub fn shifted(&self, delta: f64) -> Thresholds {
        Thresholds { values: self.values.iter().map(|t| t + delta).collect() }
    }
}

/// Derive cut-points from baseline category probabilities.
///
/// Parameters
/// ----------
/// - `probs`: `&CategoryProbabilities`
///   J validated probabilities, lowest category first.
///
/// Returns
/// -------
/// `OrdinalResult<Thresholds>`
///   J−1 strictly increasing values with
///   `threshold[i] = ln(num_i / den_i)`, `num_i = p_1 + … + p_i`,
///   `den_i = p_{i+1} + … + p_J`.
///
/// Errors
/// ------
/// - `ThresholdsNotIncreasing` only if adjacent probabilities are so small
///   relative to their neighbours that the logs collide in `f64`.
///
/// Examples
/// --------
/// ```
/// use rust_ordinal::ordinal::core::{CategoryProbabilities, derive_thresholds};
///
/// let probs = CategoryProbabilities::new(vec![0.25, 0.5, 0.25])?;
/// let cuts = derive_thresholds(&probs)?;
/// assert!((cuts.values()[0] + 3.0_f64.ln()).abs() < 1e-12);
/// assert!((cuts.values()[1] - 3.0_f64.ln()).abs() < 1e-12);
/// # Ok::<(), rust_ordinal::ordinal::errors::OrdinalError>(())
/// ```
pub fn derive_thresholds(probs: &CategoryProbabilities) -> OrdinalResult<Thresholds> {
    let p = probs.values();
    let j = p.len();
    let mut values = Vec::with_capacity(j - 1);
    let mut num = 0.0;
    for i in 0..j - 1 {
        num += p[i];
        let den: f64 = p[i + 1..].iter().sum();
        values.push((num / den).ln());
    }
    Thresholds::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The grade-distribution example and a symmetric example.
    // - Count and strict monotonicity for arbitrary valid inputs.
    // - The logistic round trip back to cumulative probabilities.
    // - Segment areas and uniform shifts.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the thresholds for the five-grade distribution (F, D, C, B, A).
    //
    // Given
    // -----
    // - p = (0.01, 0.03, 0.32, 0.43, 0.21).
    //
    // Expect
    // ------
    // - ln(0.01/0.99), ln(0.04/0.96), ln(0.36/0.64), ln(0.79/0.21).
    fn grade_distribution_thresholds() {
        // Arrange
        let probs = CategoryProbabilities::new(vec![0.01, 0.03, 0.32, 0.43, 0.21])
            .expect("valid probabilities");

        // Act
        let cuts = derive_thresholds(&probs).expect("thresholds");

        // Assert
        let expected = [-4.59512, -3.17805, -0.575364, 1.32493];
        assert_eq!(cuts.len(), 4);
        for (got, want) in cuts.values().iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // Segment areas reproduce the input probabilities and shifting keeps order.
    //
    // Given
    // -----
    // - p = (0.2, 0.3, 0.5) and a shift of −0.7.
    //
    // Expect
    // ------
    // - Segment probabilities ≈ p; shifted cut-points are each 0.7 lower.
    fn segments_recover_probabilities_and_shift_preserves_order() {
        // Arrange
        let probs = CategoryProbabilities::new(vec![0.2, 0.3, 0.5]).expect("valid");
        let cuts = derive_thresholds(&probs).expect("thresholds");

        // Act
        let segments = cuts.segment_probabilities();
        let shifted = cuts.shifted(-0.7);

        // Assert
        for (s, p) in segments.iter().zip(probs.values()) {
            assert_abs_diff_eq!(*s, *p, epsilon = 1e-12);
        }
        for (a, b) in shifted.values().iter().zip(cuts.values()) {
            assert_abs_diff_eq!(*a, b - 0.7, epsilon = 1e-12);
        }
        assert_eq!(shifted.n_categories(), 3);
    }

    fn probability_vectors() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.01_f64..1.0, 2..9).prop_map(|w| {
            let total: f64 = w.iter().sum();
            w.into_iter().map(|v| v / total).collect()
        })
    }

    proptest! {
        #[test]
        fn thresholds_count_and_strictly_increase(p in probability_vectors()) {
            let probs = CategoryProbabilities::new(p.clone()).expect("normalized weights");
            let cuts = derive_thresholds(&probs).expect("thresholds");
            prop_assert_eq!(cuts.len(), p.len() - 1);
            for w in cuts.values().windows(2) {
                prop_assert!(w[1] > w[0]);
            }
        }

        #[test]
        fn logistic_cdf_recovers_cumulative_probabilities(p in probability_vectors()) {
            let probs = CategoryProbabilities::new(p).expect("normalized weights");
            let cuts = derive_thresholds(&probs).expect("thresholds");
            let cum = probs.cumulative();
            for (f, c) in cuts.cumulative_probabilities().iter().zip(cum) {
                prop_assert!((f - c).abs() < 1e-9);
            }
        }
    }
}
