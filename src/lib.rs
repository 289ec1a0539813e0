//! rust_ordinal: ordinal logistic regression with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the ordinal workflow to Python via the `_rust_ordinal` extension module:
//! derive latent thresholds from category probabilities, simulate ordinal
//! outcomes, fit a cumulative-logit (proportional-odds) model, and test the
//! proportional-odds assumption with a Brant Wald test.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`ordinal`, `statistical_tests`,
//!   `pipeline`, and the shared `optimization` / `inference` layers) as the
//!   public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_ordinal` Python extension.
//! - Create and register Python submodules (`ordinal_models`,
//!   `statistical_tests`) under `rust_ordinal` so that dot-notation imports
//!   work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - Python-visible types mirror the invariants of their Rust counterparts
//!   (`SimDesign`, `CumulativeLogitModel`, `FittedModel`, `PoTestResult`).
//!
//! Conventions
//! -----------
//! - Categories are 1-based integers `1..=J` on both sides of the boundary.
//! - Matrices cross the boundary as row-major lists of lists.
//! - Errors from core Rust code are converted to `ValueError` (bad input) or
//!   `RuntimeError` (estimation failure) at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and can
//!   ignore the items guarded by the `python-bindings` feature.
//! - [`pipeline::contrast_scenarios`] is the one-call entry point for the
//!   proportional vs non-proportional demonstration.

pub mod inference;
pub mod optimization;
pub mod ordinal;
pub mod pipeline;
pub mod statistical_tests;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    ordinal::{
        core::{
            options::SimOpts,
            probabilities::CategoryProbabilities,
            simulation::{OrdinalSimulator, SimDesign},
            thresholds,
        },
        errors::OrdinalError,
        models::{CumulativeLogitModel, FittedModel},
    },
    statistical_tests::brant::{self, PoTestResult},
    utils::{extract_f64_vec, extract_fit_options, extract_ordinal_data, matrix_to_rows},
};

/// Baseline thresholds `logit(P(Y ≤ j))` for a category distribution.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(probabilities, /)")]
pub fn derive_thresholds<'py>(py: Python<'py>, probabilities: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let values = extract_f64_vec(py, probabilities, "probabilities")?;
    let probs = CategoryProbabilities::new(values)?;
    Ok(thresholds::derive_thresholds(&probs)?.values().to_vec())
}

/// Simulator: Python-facing wrapper for [`OrdinalSimulator`].
///
/// Purpose
/// -------
/// Build a data-generating process from Python arguments and draw samples
/// from it.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Simulator(probabilities, adjustment_coefficient, non_proportional=None,
/// n_subjects=25000, exposure_ratio=0.5, seed=42, return_latent=False)`.
///
/// Notes
/// -----
/// - `simulate()` returns `(x, y, latent)` where `x` is the 0/1 exposure
///   column, `y` the categories, and `latent` `None` unless requested.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_ordinal.ordinal_models", name = "Simulator")]
pub struct Simulator {
    inner: OrdinalSimulator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Simulator {
    #[new]
    #[pyo3(
        signature = (
            probabilities,
            adjustment_coefficient,
            non_proportional = None,
            n_subjects = 25_000,
            exposure_ratio = 0.5,
            seed = Some(42),
            return_latent = false,
        ),
        text_signature = "(probabilities, adjustment_coefficient, /, non_proportional=None, \
                          n_subjects=25000, exposure_ratio=0.5, seed=42, return_latent=False)"
    )]
    pub fn new<'py>(
        py: Python<'py>, probabilities: &Bound<'py, PyAny>, adjustment_coefficient: f64,
        non_proportional: Option<&Bound<'py, PyAny>>, n_subjects: usize, exposure_ratio: f64,
        seed: Option<u64>, return_latent: bool,
    ) -> PyResult<Self> {
        let probs = CategoryProbabilities::new(extract_f64_vec(py, probabilities, "probabilities")?)?;
        let adjustments = match non_proportional {
            Some(obj) => Some(extract_f64_vec(py, obj, "non_proportional")?),
            None => None,
        };
        let design = SimDesign::new(probs, adjustment_coefficient, adjustments)?;
        let opts = SimOpts::new(n_subjects, exposure_ratio, seed, return_latent)?;
        Ok(Simulator { inner: OrdinalSimulator::new(design, opts) })
    }

    pub fn simulate(&self) -> PyResult<(Vec<f64>, Vec<usize>, Option<Vec<f64>>)> {
        let result = self.inner.simulate()?;
        let x = result.data.x().column(0).to_vec();
        let y = result.data.y().to_vec();
        Ok((x, y, result.latent.map(|l| l.to_vec())))
    }

    #[getter]
    pub fn thresholds(&self) -> Vec<f64> {
        self.inner.design().baseline_thresholds().values().to_vec()
    }

    #[getter]
    pub fn is_proportional(&self) -> bool {
        self.inner.design().is_proportional()
    }
}

/// CumulativeLogit: Python-facing wrapper for [`CumulativeLogitModel`].
///
/// Purpose
/// -------
/// Fit `logit P(Y ≤ j | x) = α_j − x·β` from Python arrays and keep the
/// fitted result for inspection and for the Brant test.
///
/// Parameters
/// ----------
/// `CumulativeLogit(tol_grad=None, tol_cost=None, max_iter=None,
/// line_searcher=None, lbfgs_mem=None, covariance='classical')`.
///
/// Notes
/// -----
/// - Accessing results before `fit` raises `RuntimeError`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_ordinal.ordinal_models", name = "CumulativeLogit")]
pub struct CumulativeLogit {
    options: crate::ordinal::core::options::FitOptions,
    fitted: Option<FittedModel>,
}

#[cfg(feature = "python-bindings")]
impl CumulativeLogit {
    fn fitted(&self) -> PyResult<&FittedModel> {
        self.fitted.as_ref().ok_or_else(|| OrdinalError::ModelNotFitted.into())
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl CumulativeLogit {
    #[new]
    #[pyo3(
        signature = (
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            covariance = None,
        ),
        text_signature = "(/, tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, \
                          lbfgs_mem=None, covariance='classical')"
    )]
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, covariance: Option<&str>,
    ) -> PyResult<Self> {
        let options =
            extract_fit_options(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, covariance)?;
        Ok(CumulativeLogit { options, fitted: None })
    }

    #[pyo3(
        signature = (x, y, n_categories = None, covariate_names = None),
        text_signature = "(self, x, y, /, n_categories=None, covariate_names=None)"
    )]
    pub fn fit<'py>(
        &mut self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        n_categories: Option<usize>, covariate_names: Option<Vec<String>>,
    ) -> PyResult<()> {
        let data = extract_ordinal_data(py, x, y, n_categories, covariate_names)?;
        let model = CumulativeLogitModel::for_data(&data, self.options.clone())?;
        self.fitted = Some(model.fit(&data)?);
        Ok(())
    }

    /// Brant test against the data the model was fitted on.
    #[pyo3(
        signature = (x, y, n_categories = None, covariate_names = None),
        text_signature = "(self, x, y, /, n_categories=None, covariate_names=None)"
    )]
    pub fn brant_test<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        n_categories: Option<usize>, covariate_names: Option<Vec<String>>,
    ) -> PyResult<BrantTest> {
        let fitted = self.fitted()?;
        let data = extract_ordinal_data(py, x, y, n_categories, covariate_names)?;
        let inner = brant::brant_test(fitted, &data, &self.options)?;
        Ok(BrantTest { inner })
    }

    #[getter]
    pub fn intercepts(&self) -> PyResult<Vec<f64>> {
        Ok(self.fitted()?.intercepts.to_vec())
    }

    #[getter]
    pub fn slopes(&self) -> PyResult<Vec<f64>> {
        Ok(self.fitted()?.slopes.to_vec())
    }

    #[getter]
    pub fn std_errors(&self) -> PyResult<Vec<f64>> {
        Ok(self.fitted()?.std_errors.to_vec())
    }

    #[getter]
    pub fn covariance(&self) -> PyResult<Vec<Vec<f64>>> {
        Ok(matrix_to_rows(&self.fitted()?.covariance))
    }

    #[getter]
    pub fn loglik(&self) -> PyResult<f64> {
        Ok(self.fitted()?.loglik)
    }

    #[getter]
    pub fn aic(&self) -> PyResult<f64> {
        Ok(self.fitted()?.aic())
    }

    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        Ok(self.fitted()?.optim.converged)
    }

    #[getter]
    pub fn status(&self) -> PyResult<String> {
        Ok(self.fitted()?.optim.status.clone())
    }

    /// `(term, estimate, std_error, z_value, p_value)` rows.
    pub fn coefficients(&self) -> PyResult<Vec<(String, f64, f64, f64, f64)>> {
        let rows = self.fitted()?.coefficients()?;
        Ok(rows.into_iter().map(|r| (r.term, r.estimate, r.std_error, r.z_value, r.p_value)).collect())
    }

    #[pyo3(text_signature = "(self, x, /)")]
    pub fn predict_proba(&self, x: Vec<f64>) -> PyResult<Vec<f64>> {
        let fitted = self.fitted()?;
        if x.iter().any(|v| !v.is_finite()) {
            return Err(PyValueError::new_err("x must be finite"));
        }
        Ok(fitted.category_probabilities(&x)?)
    }
}

/// BrantTest: proportional-odds test result exposed to Python.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_ordinal.statistical_tests", name = "BrantTest")]
pub struct BrantTest {
    inner: PoTestResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BrantTest {
    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.omnibus.statistic
    }

    #[getter]
    pub fn df(&self) -> usize {
        self.inner.omnibus.df
    }

    #[getter]
    pub fn pvalue(&self) -> f64 {
        self.inner.omnibus.p_value
    }

    /// Per-covariate `(term, statistic, df, p_value)` rows.
    #[getter]
    pub fn rows(&self) -> Vec<(String, f64, usize, f64)> {
        self.inner.rows.iter().map(|r| (r.term.clone(), r.statistic, r.df, r.p_value)).collect()
    }

    /// Slopes of the J−1 binary fits, one row per cut.
    #[getter]
    pub fn binary_slopes(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(&self.inner.binary_slopes)
    }
}

/// _rust_ordinal: PyO3 module initializer for the Python extension.
///
/// Creates the `ordinal_models` and `statistical_tests` submodules, attaches
/// them to `_rust_ordinal`, and registers both in `sys.modules` so that
/// dotted imports resolve.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_ordinal<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let ordinal_models_mod = PyModule::new(_py, "ordinal_models")?;
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    ordinal_models(_py, m, &ordinal_models_mod)?;
    statistical_tests(_py, m, &statistical_tests_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_ordinal.ordinal_models", ordinal_models_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_ordinal.statistical_tests", statistical_tests_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn ordinal_models<'py>(
    _py: Python, rust_ordinal: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(derive_thresholds, m)?)?;
    m.add_class::<Simulator>()?;
    m.add_class::<CumulativeLogit>()?;
    rust_ordinal.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests<'py>(
    _py: Python, rust_ordinal: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<BrantTest>()?;
    rust_ordinal.add_submodule(m)?;
    Ok(())
}
