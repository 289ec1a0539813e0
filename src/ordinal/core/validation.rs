//! Ordinal validation helpers: reusable checks for probabilities, thresholds,
//! data, and simulation inputs.
//!
//! Purpose
//! -------
//! Keep the invariant checks for every boundary type in one place so the
//! constructors (`CategoryProbabilities`, `Thresholds`, `OrdinalData`,
//! `SimDesign`, `SimOpts`) and the models fail fast with the same
//! structured [`OrdinalError`] variants.
//!
//! Invariants & assumptions
//! ------------------------
//! - Probabilities: J ≥ 2, finite, strictly positive, summing to 1 within
//!   [`PROB_SUM_TOL`].
//! - Thresholds: finite and strictly increasing.
//! - Data: non-empty, covariate rows match outcomes, covariates finite,
//!   outcomes within `1..=J`.
//!
//! Conventions
//! -----------
//! - Indices reported in errors are 0-based positions; the `Display` impl
//!   renders category numbers 1-based.
//! - No I/O or logging.
use crate::ordinal::{
    core::probabilities::PROB_SUM_TOL,
    errors::{OrdinalError, OrdinalResult},
};
use ndarray::{Array1, Array2};

pub fn validate_probabilities(values: &[f64]) -> OrdinalResult<()> {
    if values.len() < 2 {
        return Err(OrdinalError::TooFewCategories { found: values.len() });
    }
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(OrdinalError::NonFiniteProbability { index, value });
        }
        if value <= 0.0 {
            return Err(OrdinalError::NonPositiveProbability { index, value });
        }
    }
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > PROB_SUM_TOL {
        return Err(OrdinalError::ProbabilitySum { sum });
    }
    Ok(())
}

/// Finite, strictly increasing, at least one cut-point.
pub fn validate_thresholds(values: &[f64]) -> OrdinalResult<()> {
    if values.is_empty() {
        return Err(OrdinalError::TooFewCategories { found: 1 });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(OrdinalError::NonFiniteThreshold { index, value: values[index] });
    }
    if let Some(index) = (1..values.len()).find(|&i| values[i] <= values[i - 1]) {
        return Err(OrdinalError::ThresholdsNotIncreasing { index });
    }
    Ok(())
}

/// Shape and range checks for a covariate matrix and outcome vector.
///
/// # Errors
/// - `TooFewCategories` when `n_categories < 2`.
/// - `EmptyData`, `LengthMismatch`, `NonFiniteCovariate`,
///   `CategoryOutOfRange`.
pub fn validate_data(x: &Array2<f64>, y: &Array1<usize>, n_categories: usize) -> OrdinalResult<()> {
    if n_categories < 2 {
        return Err(OrdinalError::TooFewCategories { found: n_categories });
    }
    if y.is_empty() {
        return Err(OrdinalError::EmptyData);
    }
    if x.nrows() != y.len() {
        return Err(OrdinalError::LengthMismatch { covariates: x.nrows(), outcomes: y.len() });
    }
    for ((row, col), &value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(OrdinalError::NonFiniteCovariate { row, col, value });
        }
    }
    if let Some(index) = y.iter().position(|&c| c == 0 || c > n_categories) {
        return Err(OrdinalError::CategoryOutOfRange { index, category: y[index], n_categories });
    }
    Ok(())
}

/// Allocation probability for the exposed group, strictly inside (0, 1).
pub fn validate_exposure_ratio(ratio: f64) -> OrdinalResult<()> {
    if !(ratio.is_finite() && ratio > 0.0 && ratio < 1.0) {
        return Err(OrdinalError::InvalidExposureRatio { value: ratio });
    }
    Ok(())
}

/// Non-proportional adjustments: finite, at most `n_thresholds` entries.
pub fn validate_adjustments(adjustments: &[f64], n_thresholds: usize) -> OrdinalResult<()> {
    if adjustments.len() > n_thresholds {
        return Err(OrdinalError::AdjustmentTooLong { max: n_thresholds, found: adjustments.len() });
    }
    if let Some(index) = adjustments.iter().position(|v| !v.is_finite()) {
        return Err(OrdinalError::NonFiniteAdjustment { index, value: adjustments[index] });
    }
    Ok(())
}

/// Significance level strictly inside (0, 1).
pub fn validate_alpha(alpha: f64) -> OrdinalResult<()> {
    if !(alpha.is_finite() && alpha > 0.0 && alpha < 1.0) {
        return Err(OrdinalError::InvalidAlpha { value: alpha });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Boundary cases for each helper: off-by-one lengths, zeros, NaNs, ties.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Thresholds must be strictly increasing; ties are rejected.
    //
    // Given
    // -----
    // - (-1, 0, 0), (-1, NaN), and an empty slice.
    //
    // Expect
    // ------
    // - `ThresholdsNotIncreasing { index: 2 }`, `NonFiniteThreshold`,
    //   `TooFewCategories`.
    fn thresholds_require_strict_increase() {
        assert_eq!(
            validate_thresholds(&[-1.0, 0.0, 0.0]),
            Err(OrdinalError::ThresholdsNotIncreasing { index: 2 })
        );
        assert!(matches!(
            validate_thresholds(&[-1.0, f64::NAN]),
            Err(OrdinalError::NonFiniteThreshold { index: 1, .. })
        ));
        assert!(validate_thresholds(&[]).is_err());
        assert!(validate_thresholds(&[-2.0, 0.5, 3.0]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Data validation catches each shape and range violation.
    //
    // Given
    // -----
    // - A 3×1 covariate matrix paired with outcomes of length 2, outcome 0,
    //   outcome J + 1, and a NaN covariate.
    //
    // Expect
    // ------
    // - `LengthMismatch`, `CategoryOutOfRange` (twice), `NonFiniteCovariate`.
    fn data_validation_catches_shape_and_range_errors() {
        // Arrange
        let x = array![[0.0], [1.0], [1.0]];
        let x_nan = array![[0.0], [f64::NAN], [1.0]];

        // Act + Assert
        assert!(matches!(
            validate_data(&x, &array![1, 2], 3),
            Err(OrdinalError::LengthMismatch { covariates: 3, outcomes: 2 })
        ));
        assert!(matches!(
            validate_data(&x, &array![1, 0, 2], 3),
            Err(OrdinalError::CategoryOutOfRange { index: 1, category: 0, .. })
        ));
        assert!(matches!(
            validate_data(&x, &array![1, 4, 2], 3),
            Err(OrdinalError::CategoryOutOfRange { index: 1, category: 4, .. })
        ));
        assert!(matches!(
            validate_data(&x_nan, &array![1, 2, 3], 3),
            Err(OrdinalError::NonFiniteCovariate { row: 1, col: 0, .. })
        ));
        assert!(validate_data(&x, &array![1, 2, 3], 3).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Simulation inputs are bounded as documented.
    //
    // Given
    // -----
    // - Ratios 0, 1, 0.5; adjustments longer than allowed or containing ∞.
    //
    // Expect
    // ------
    // - Only the interior ratio and short finite adjustments pass.
    fn simulation_inputs_are_bounded() {
        assert!(validate_exposure_ratio(0.0).is_err());
        assert!(validate_exposure_ratio(1.0).is_err());
        assert!(validate_exposure_ratio(0.5).is_ok());
        assert_eq!(
            validate_adjustments(&[0.0, 0.0, -1.0, 0.0, 0.0], 4),
            Err(OrdinalError::AdjustmentTooLong { max: 4, found: 5 })
        );
        assert!(validate_adjustments(&[0.0, f64::INFINITY], 4).is_err());
        assert!(validate_adjustments(&[0.0, 0.0, -1.0], 4).is_ok());
        assert!(validate_alpha(0.05).is_ok());
        assert!(validate_alpha(1.0).is_err());
    }
}
