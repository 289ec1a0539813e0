//! Subject and OrdinalData: the observed ordinal sample.
//!
//! Purpose
//! -------
//! Represent a sample of subjects, each with a covariate vector and an
//! observed category in `1..=J`, in the column layout the likelihoods
//! consume: an `n × p` covariate matrix and an outcome vector.
//!
//! Key behaviors
//! -------------
//! - [`OrdinalData::new`] and [`OrdinalData::from_subjects`] validate shape,
//!   finiteness, and category range once, at construction.
//! - [`OrdinalData::category_counts`] feeds starting values and the
//!   empty-category check.
//! - [`OrdinalData::binary_split`] builds the `I(Y ≤ j)` data set used by the
//!   per-threshold binary fits of the proportional-odds test.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x.nrows() == y.len() > 0`; all covariates finite; `1 ≤ y_i ≤ J`, J ≥ 2.
//! - Data are immutable after construction.
use crate::ordinal::{
    core::validation::validate_data,
    errors::{OrdinalError, OrdinalResult},
};
use ndarray::{Array1, Array2, ArrayView1};

/// One subject: covariates plus the observed category (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub covariates: Vec<f64>,
    pub category: usize,
}

impl Subject {
    pub fn new(covariates: Vec<f64>, category: usize) -> Self {
        Self { covariates, category }
    }
}

/// Validated ordinal sample in column form.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalData {
    x: Array2<f64>,
    y: Array1<usize>,
    n_categories: usize,
    covariate_names: Vec<String>,
}

impl OrdinalData {
    /// Build a sample from a covariate matrix and 1-based outcomes.
    ///
    /// Covariates are named `x1, x2, …`; see
    /// [`with_covariate_names`](Self::with_covariate_names).
    ///
    /// # Errors
    /// - `TooFewCategories`, `EmptyData`, `LengthMismatch`,
    ///   `NonFiniteCovariate`, `CategoryOutOfRange`.
    pub fn new(x: Array2<f64>, y: Array1<usize>, n_categories: usize) -> OrdinalResult<Self> {
        validate_data(&x, &y, n_categories)?;
        let covariate_names = (1..=x.ncols()).map(|k| format!("x{k}")).collect();
        Ok(Self { x, y, n_categories, covariate_names })
    }

    /// Build a sample from a Subject collection.
    ///
    /// # Errors
    /// - `EmptyData` for an empty slice.
    /// - `CovariateCountMismatch` when subjects disagree on covariate count.
    /// - Everything [`OrdinalData::new`] reports.
    pub fn from_subjects(subjects: &[Subject], n_categories: usize) -> OrdinalResult<Self> {
        let first = subjects.first().ok_or(OrdinalError::EmptyData)?;
        let p = first.covariates.len();
        let mut flat = Vec::with_capacity(subjects.len() * p);
        for s in subjects {
            if s.covariates.len() != p {
                return Err(OrdinalError::CovariateCountMismatch {
                    expected: p,
                    found: s.covariates.len(),
                });
            }
            flat.extend_from_slice(&s.covariates);
        }
        let x = Array2::from_shape_vec((subjects.len(), p), flat).map_err(|_| {
            OrdinalError::LengthMismatch { covariates: subjects.len() * p, outcomes: subjects.len() }
        })?;
        let y = subjects.iter().map(|s| s.category).collect();
        Self::new(x, y, n_categories)
    }

    /// Replace the default covariate names.
    ///
    /// # Errors
    /// - `CovariateCountMismatch` if the name count differs from `p`.
    pub fn with_covariate_names(mut self, names: Vec<String>) -> OrdinalResult<Self> {
        if names.len() != self.x.ncols() {
            return Err(OrdinalError::CovariateCountMismatch {
                expected: self.x.ncols(),
                found: names.len(),
            });
        }
        self.covariate_names = names;
        Ok(self)
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<usize> {
        &self.y
    }

    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    pub fn n_covariates(&self) -> usize {
        self.x.ncols()
    }

    pub fn n_categories(&self) -> usize {
        self.n_categories
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.covariate_names
    }

    pub fn covariate_row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.x.row(i)
    }

    /// Number of subjects in each category, index 0 = category 1.
    pub fn category_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_categories];
        for &c in self.y.iter() {
            counts[c - 1] += 1;
        }
        counts
    }

    /// Two-category sample for the cut after category `j`.
    ///
    /// Category 1 is `Y ≤ j` and category 2 is `Y > j`; covariates and names
    /// are shared with `self`.
    ///
    /// # Errors
    /// - `CategoryOutOfRange` unless `1 ≤ j < J`.
    pub fn binary_split(&self, j: usize) -> OrdinalResult<OrdinalData> {
        if j == 0 || j >= self.n_categories {
            return Err(OrdinalError::CategoryOutOfRange {
                index: 0,
                category: j,
                n_categories: self.n_categories - 1,
            });
        }
        let y = self.y.mapv(|c| if c <= j { 1 } else { 2 });
        Ok(OrdinalData {
            x: self.x.clone(),
            y,
            n_categories: 2,
            covariate_names: self.covariate_names.clone(),
        })
    }

    /// Row-wise view back into Subjects.
    pub fn subjects(&self) -> Vec<Subject> {
        self.x
            .outer_iter()
            .zip(self.y.iter())
            .map(|(row, &c)| Subject::new(row.to_vec(), c))
            .collect()
    }
}
