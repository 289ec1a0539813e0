//! Diagnostics that feed proportional-odds plots.
//!
//! - [`cumulative_overlay`]: per covariate pattern, the empirical
//!   `P(Y ≤ j)` next to the fitted one.
//! - [`empirical_log_odds_ratios`]: per cut, the difference of empirical
//!   cumulative logits between the two levels of a binary covariate. Under
//!   proportional odds every entry estimates the same slope.
//!
//! Nothing here draws; the outputs are plain numbers for a plotting layer.
use std::collections::HashMap;

use crate::{
    optimization::numerical_stability::logit,
    ordinal::{
        core::data::OrdinalData,
        errors::{OrdinalError, OrdinalResult},
        models::FittedModel,
    },
};

/// Empirical and fitted cumulative probabilities for one covariate pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRow {
    pub covariates: Vec<f64>,
    pub n: usize,
    pub empirical: Vec<f64>,
    pub fitted: Vec<f64>,
}

/// Group subjects by exact covariate pattern, in order of first appearance.
///
/// One pass over the rows with a hashed pattern lookup, so the grouping costs
/// O(n·p). Intended for discrete designs: a continuous covariate yields one
/// row per distinct value, each with its own fitted curve.
///
/// # Errors
/// - `CategoryCountMismatch` / `CovariateCountMismatch` if `model` and
///   `data` disagree.
pub fn cumulative_overlay(model: &FittedModel, data: &OrdinalData) -> OrdinalResult<Vec<OverlayRow>> {
    if model.n_categories != data.n_categories() {
        return Err(OrdinalError::CategoryCountMismatch {
            expected: model.n_categories,
            found: data.n_categories(),
        });
    }
    if model.slopes.len() != data.n_covariates() {
        return Err(OrdinalError::CovariateCountMismatch {
            expected: model.slopes.len(),
            found: data.n_covariates(),
        });
    }
    let n_categories = data.n_categories();
    let mut slots: HashMap<Vec<u64>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<f64>, Vec<usize>)> = Vec::new();
    for (row, &category) in data.x().outer_iter().zip(data.y().iter()) {
        // +0.0 folds −0.0 into the same pattern as 0.0.
        let key: Vec<u64> = row.iter().map(|&v| (v + 0.0).to_bits()).collect();
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push((row.to_vec(), vec![0; n_categories]));
            groups.len() - 1
        });
        groups[slot].1[category - 1] += 1;
    }

    groups
        .into_iter()
        .map(|(covariates, counts)| {
            let n: usize = counts.iter().sum();
            let mut running = 0;
            let empirical = counts[..n_categories - 1]
                .iter()
                .map(|&c| {
                    running += c;
                    running as f64 / n as f64
                })
                .collect();
            let fitted = model.cumulative_probabilities(&covariates)?;
            Ok(OverlayRow { covariates, n, empirical, fitted })
        })
        .collect()
}

/// `logit P̂(Y ≤ j | x_c = 0) − logit P̂(Y ≤ j | x_c ≠ 0)` for each cut.
///
/// With `logit P(Y ≤ j | x) = α_j − β·x` this estimates `β_c` at every cut.
/// A cut where one group has all or none of its subjects at or below `j`
/// gives an infinite entry.
///
/// # Errors
/// - `CovariateCountMismatch` if `covariate` is out of range.
/// - `EmptyData` if either level of the covariate has no subjects.
pub fn empirical_log_odds_ratios(data: &OrdinalData, covariate: usize) -> OrdinalResult<Vec<f64>> {
    if covariate >= data.n_covariates() {
        return Err(OrdinalError::CovariateCountMismatch {
            expected: data.n_covariates(),
            found: covariate + 1,
        });
    }
    let n_categories = data.n_categories();
    let mut counts = [vec![0usize; n_categories], vec![0usize; n_categories]];
    for (row, &c) in data.x().outer_iter().zip(data.y().iter()) {
        let level = usize::from(row[covariate] != 0.0);
        counts[level][c - 1] += 1;
    }
    let cumulative = |group: &[usize]| -> OrdinalResult<Vec<f64>> {
        let n: usize = group.iter().sum();
        if n == 0 {
            return Err(OrdinalError::EmptyData);
        }
        let mut running = 0;
        Ok(group[..n_categories - 1]
            .iter()
            .map(|&c| {
                running += c;
                running as f64 / n as f64
            })
            .collect())
    };
    let reference = cumulative(&counts[0])?;
    let exposed = cumulative(&counts[1])?;
    Ok(reference.iter().zip(&exposed).map(|(&r, &e)| logit(r) - logit(e)).collect())
}
