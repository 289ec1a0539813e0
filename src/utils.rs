//! Conversions between Python inputs and the crate's core types.
//!
//! Everything here sits behind the `python-bindings` feature and is only
//! called from the `#[pyclass]` wrappers in the crate root.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
    ordinal::{
        core::{
            data::OrdinalData,
            options::{CovarianceKind, FitOptions},
        },
        errors::OrdinalError,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
    PyUntypedArrayMethods,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned copy of a 1-D float input.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(slice.to_vec())
}

/// Covariate matrix from a 2-D array, a DataFrame, a sequence of rows, or a
/// 1-D input read as a single covariate column.
#[cfg(feature = "python-bindings")]
pub fn extract_covariates<'py>(py: Python<'py>, raw_x: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    let candidate = match raw_x.call_method("to_numpy", (false,), None) {
        Ok(obj) => obj,
        Err(_) => raw_x.clone(),
    };

    if let Ok(arr) = candidate.extract::<PyReadonlyArray2<f64>>() {
        if arr.is_c_contiguous() {
            let shape = arr.shape();
            let (rows, cols) = (shape[0], shape[1]);
            let slice = arr
                .as_slice()
                .map_err(|_| PyValueError::new_err("x must be a C-contiguous float64 array"))?;
            return Array2::from_shape_vec((rows, cols), slice.to_vec())
                .map_err(|e| PyValueError::new_err(e.to_string()));
        }
    }

    if let Ok(rows) = candidate.extract::<Vec<Vec<f64>>>() {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(PyValueError::new_err("x rows must all have the same length"));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        return Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| PyValueError::new_err(e.to_string()));
    }

    let column = extract_f64_vec(py, &candidate, "x")?;
    let n = column.len();
    Array2::from_shape_vec((n, 1), column).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Category labels `1..=J` from any integer sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_categories(raw_y: &Bound<'_, PyAny>) -> PyResult<Array1<usize>> {
    let candidate = match raw_y.call_method0("tolist") {
        Ok(obj) => obj,
        Err(_) => raw_y.clone(),
    };
    let labels: Vec<i64> = candidate
        .extract()
        .map_err(|_| PyTypeError::new_err("y must be a 1-D sequence of integer categories"))?;
    labels
        .into_iter()
        .enumerate()
        .map(|(index, c)| {
            usize::try_from(c)
                .ok()
                .filter(|&c| c >= 1)
                .ok_or_else(|| PyValueError::new_err(format!("y[{index}] = {c} is not a category label >= 1")))
        })
        .collect()
}

#[cfg(feature = "python-bindings")]
pub fn extract_ordinal_data<'py>(
    py: Python<'py>, raw_x: &Bound<'py, PyAny>, raw_y: &Bound<'py, PyAny>,
    n_categories: Option<usize>, covariate_names: Option<Vec<String>>,
) -> PyResult<OrdinalData> {
    let x = extract_covariates(py, raw_x)?;
    let y = extract_categories(raw_y)?;
    let n_categories = match n_categories {
        Some(j) => j,
        None => y.iter().copied().max().ok_or(OrdinalError::EmptyData)?,
    };
    let data = OrdinalData::new(x, y, n_categories)?;
    Ok(match covariate_names {
        Some(names) => data.with_covariate_names(names)?,
        None => data,
    })
}

#[cfg(feature = "python-bindings")]
pub fn extract_fit_options(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, covariance: Option<&str>,
) -> PyResult<FitOptions> {
    use std::str::FromStr;

    let defaults = MLEOptions::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter).map_err(OrdinalError::from)?
    };
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(OrdinalError::from)?,
        None => LineSearcher::MoreThuente,
    };
    let mle = MLEOptions::new(tols, ls, false, lbfgs_mem).map_err(OrdinalError::from)?;
    let covariance = match covariance {
        Some(name) => CovarianceKind::from_str(name)?,
        None => CovarianceKind::Classical,
    };
    Ok(FitOptions::new(mle, covariance))
}

/// `Array2` → row-major `Vec<Vec<f64>>` for returning to Python.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.outer_iter().map(|row| row.to_vec()).collect()
}
