//! CategoryProbabilities: validated baseline probabilities of an ordinal scale.
use crate::ordinal::{
    core::validation::validate_probabilities,
    errors::{OrdinalError, OrdinalResult},
};

/// Absolute tolerance on `|Σ p − 1|`.
pub const PROB_SUM_TOL: f64 = 1e-8;

/// Baseline probability of each ordinal category, lowest category first.
///
/// Invariants
/// ----------
/// - At least two categories.
/// - Every entry finite and strictly positive.
/// - Entries sum to 1 within [`PROB_SUM_TOL`].
///
/// Instances are immutable; the only way to build one is through a
/// validating constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProbabilities {
    values: Vec<f64>,
}

impl CategoryProbabilities {
    /// Validate and wrap a probability vector.
    ///
    /// # Errors
    /// - `TooFewCategories`, `NonFiniteProbability`,
    ///   `NonPositiveProbability`, or `ProbabilitySum`.
    pub fn new(values: Vec<f64>) -> OrdinalResult<Self> {
        validate_probabilities(&values)?;
        Ok(Self { values })
    }

    /// Empirical marginal frequencies from per-category counts.
    ///
    /// # Errors
    /// - `TooFewCategories` if fewer than two counts are given.
    /// - `DegenerateCategory` (1-based) for the first zero count.
    pub fn from_counts(counts: &[usize]) -> OrdinalResult<Self> {
        if counts.len() < 2 {
            return Err(OrdinalError::TooFewCategories { found: counts.len() });
        }
        if let Some(idx) = counts.iter().position(|&c| c == 0) {
            return Err(OrdinalError::DegenerateCategory { category: idx + 1 });
        }
        let total = counts.iter().sum::<usize>() as f64;
        Self::new(counts.iter().map(|&c| c as f64 / total).collect())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn n_categories(&self) -> usize {
        self.values.len()
    }

    /// Running sums `P(Y ≤ j)` for j = 1..J. The last entry is the total mass.
    pub fn cumulative(&self) -> Vec<f64> {
        self.values
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Validation of each invariant and the count-based constructor.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Each malformed vector maps to its dedicated error.
    //
    // Given
    // -----
    // - One category, a zero entry, a NaN entry, and a vector summing to 0.9.
    //
    // Expect
    // ------
    // - `TooFewCategories`, `NonPositiveProbability`, `NonFiniteProbability`,
    //   `ProbabilitySum`.
    fn new_rejects_each_malformed_vector() {
        assert_eq!(
            CategoryProbabilities::new(vec![1.0]),
            Err(OrdinalError::TooFewCategories { found: 1 })
        );
        assert!(matches!(
            CategoryProbabilities::new(vec![0.5, 0.0, 0.5]),
            Err(OrdinalError::NonPositiveProbability { index: 1, .. })
        ));
        assert!(matches!(
            CategoryProbabilities::new(vec![0.5, f64::NAN]),
            Err(OrdinalError::NonFiniteProbability { index: 1, .. })
        ));
        assert!(matches!(
            CategoryProbabilities::new(vec![0.4, 0.5]),
            Err(OrdinalError::ProbabilitySum { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `from_counts` normalizes counts and flags empty categories 1-based.
    //
    // Given
    // -----
    // - Counts (10, 30, 60) and (5, 0, 5).
    //
    // Expect
    // ------
    // - (0.1, 0.3, 0.6) with cumulative (0.1, 0.4, 1.0).
    // - `DegenerateCategory { category: 2 }`.
    fn from_counts_normalizes_and_flags_empty_categories() {
        // Act
        let probs = CategoryProbabilities::from_counts(&[10, 30, 60]).expect("valid counts");
        let empty = CategoryProbabilities::from_counts(&[5, 0, 5]);

        // Assert
        assert_eq!(probs.n_categories(), 3);
        let cum = probs.cumulative();
        assert_abs_diff_eq!(cum[0], 0.1, epsilon = 1e-15);
        assert_abs_diff_eq!(cum[1], 0.4, epsilon = 1e-15);
        assert_abs_diff_eq!(cum[2], 1.0, epsilon = 1e-15);
        assert_eq!(empty, Err(OrdinalError::DegenerateCategory { category: 2 }));
    }
}
