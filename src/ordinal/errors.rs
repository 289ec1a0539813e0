//! ordinal::errors: error type for the ordinal regression pipeline.
//!
//! Purpose
//! -------
//! Give threshold derivation, simulation, fitting, and the proportional-odds
//! test a single error enum, [`OrdinalError`], grouped into three classes:
//! malformed inputs, optimizer non-convergence, and empty categories.
//! Optimizer-layer failures are wrapped rather than flattened.
//!
//! Conventions
//! -----------
//! - Category indices in messages are 1-based, matching the ordinal scale.
//! - With the `python-bindings` feature, errors become `ValueError`
//!   (invalid input, empty category) or `RuntimeError` (everything else).
use crate::optimization::errors::OptError;

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyRuntimeError, PyValueError},
};

/// Result alias for the ordinal layer.
pub type OrdinalResult<T> = Result<T, OrdinalError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OrdinalError {
    // ---- Category probabilities / thresholds ----
    TooFewCategories {
        found: usize,
    },
    NonFiniteProbability {
        index: usize,
        value: f64,
    },
    NonPositiveProbability {
        index: usize,
        value: f64,
    },
    ProbabilitySum {
        sum: f64,
    },
    NonFiniteThreshold {
        index: usize,
        value: f64,
    },
    ThresholdsNotIncreasing {
        index: usize,
    },

    // ---- Data ----
    EmptyData,
    LengthMismatch {
        covariates: usize,
        outcomes: usize,
    },
    CategoryOutOfRange {
        index: usize,
        category: usize,
        n_categories: usize,
    },
    NonFiniteCovariate {
        row: usize,
        col: usize,
        value: f64,
    },
    CovariateCountMismatch {
        expected: usize,
        found: usize,
    },
    CategoryCountMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Simulation ----
    InvalidExposureRatio {
        value: f64,
    },
    InvalidAdjustment {
        value: f64,
    },
    AdjustmentTooLong {
        max: usize,
        found: usize,
    },
    NonFiniteAdjustment {
        index: usize,
        value: f64,
    },

    // ---- Model ----
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },
    TestRequiresThreeCategories {
        found: usize,
    },
    InvalidAlpha {
        value: f64,
    },
    InvalidCovarianceKind {
        name: String,
    },
    ModelNotFitted,

    // ---- Estimation ----
    DegenerateCategory {
        category: usize,
    },
    NonConvergence {
        status: String,
        iterations: usize,
    },
    Optimization(OptError),
    Distribution {
        text: String,
    },
}

impl OrdinalError {
    /// `true` for every malformed-input variant.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(
            self,
            OrdinalError::DegenerateCategory { .. }
                | OrdinalError::ModelNotFitted
                | OrdinalError::NonConvergence { .. }
                | OrdinalError::Optimization(_)
                | OrdinalError::Distribution { .. }
        )
    }
}

impl std::error::Error for OrdinalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrdinalError::Optimization(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrdinalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Category probabilities / thresholds ----
            OrdinalError::TooFewCategories { found } => {
                write!(f, "At least two categories are required, found {found}")
            }
            OrdinalError::NonFiniteProbability { index, value } => {
                write!(f, "Probability for category {} must be finite, got {value}", index + 1)
            }
            OrdinalError::NonPositiveProbability { index, value } => {
                write!(f, "Probability for category {} must be > 0, got {value}", index + 1)
            }
            OrdinalError::ProbabilitySum { sum } => {
                write!(f, "Category probabilities must sum to 1, got {sum}")
            }
            OrdinalError::NonFiniteThreshold { index, value } => {
                write!(f, "Threshold {} must be finite, got {value}", index + 1)
            }
            OrdinalError::ThresholdsNotIncreasing { index } => {
                write!(f, "Threshold {} is not greater than threshold {}", index + 1, index)
            }

            // ---- Data ----
            OrdinalError::EmptyData => write!(f, "Data set contains no subjects"),
            OrdinalError::LengthMismatch { covariates, outcomes } => {
                write!(f, "Covariate rows ({covariates}) and outcomes ({outcomes}) differ in length")
            }
            OrdinalError::CategoryOutOfRange { index, category, n_categories } => {
                write!(
                    f,
                    "Outcome at position {index} is category {category}, outside 1..={n_categories}"
                )
            }
            OrdinalError::NonFiniteCovariate { row, col, value } => {
                write!(f, "Covariate at ({row}, {col}) must be finite, got {value}")
            }
            OrdinalError::CovariateCountMismatch { expected, found } => {
                write!(f, "Expected {expected} covariates, found {found}")
            }
            OrdinalError::CategoryCountMismatch { expected, found } => {
                write!(f, "Expected {expected} categories, found {found}")
            }

            // ---- Simulation ----
            OrdinalError::InvalidExposureRatio { value } => {
                write!(f, "Exposure ratio must lie strictly between 0 and 1, got {value}")
            }
            OrdinalError::InvalidAdjustment { value } => {
                write!(f, "Adjustment coefficient must be finite, got {value}")
            }
            OrdinalError::AdjustmentTooLong { max, found } => {
                write!(f, "Non-proportional adjustment has {found} entries, at most {max} allowed")
            }
            OrdinalError::NonFiniteAdjustment { index, value } => {
                write!(f, "Non-proportional adjustment {} must be finite, got {value}", index + 1)
            }

            // ---- Model ----
            OrdinalError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, got {actual}")
            }
            OrdinalError::TestRequiresThreeCategories { found } => {
                write!(
                    f,
                    "The proportional-odds test needs at least three categories, found {found}"
                )
            }
            OrdinalError::InvalidAlpha { value } => {
                write!(f, "Significance level must lie strictly between 0 and 1, got {value}")
            }
            OrdinalError::InvalidCovarianceKind { name } => {
                write!(f, "Unknown covariance kind '{name}', expected 'classical' or 'robust'")
            }
            OrdinalError::ModelNotFitted => write!(f, "Model has not been fitted yet"),

            // ---- Estimation ----
            OrdinalError::DegenerateCategory { category } => {
                write!(f, "Category {category} has no observations; its threshold is inestimable")
            }
            OrdinalError::NonConvergence { status, iterations } => {
                write!(f, "Optimizer did not converge after {iterations} iterations ({status})")
            }
            OrdinalError::Optimization(err) => write!(f, "Optimization failed: {err}"),
            OrdinalError::Distribution { text } => {
                write!(f, "Reference distribution error: {text}")
            }
        }
    }
}

impl From<OptError> for OrdinalError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::ThetaLengthMismatch { expected, actual } => {
                OrdinalError::ThetaLengthMismatch { expected, actual }
            }
            other => OrdinalError::Optimization(other),
        }
    }
}

/// Lets a `LogLikelihood` implementation use `?` on ordinal validation.
impl From<OrdinalError> for OptError {
    fn from(err: OrdinalError) -> Self {
        match err {
            OrdinalError::Optimization(inner) => inner,
            OrdinalError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            other => OptError::ModelError { text: other.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OrdinalError> for PyErr {
    fn from(err: OrdinalError) -> PyErr {
        if err.is_invalid_input() || matches!(err, OrdinalError::DegenerateCategory { .. }) {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}
