//! pipeline: threshold derivation → simulation → fit → proportional-odds test.
//!
//! Purpose
//! -------
//! Run the four stages end to end for one data-generating process
//! ([`run_scenario`]) or for the proportional / non-proportional pair that
//! shows the test working in both directions ([`contrast_scenarios`]).
//!
//! Conventions
//! -----------
//! - Each run is wrapped in an `info_span!("scenario", ...)`; stage results
//!   are logged at `info` level, optimizer details at `debug` by the stages.
//! - Reports keep every intermediate so callers can tabulate or plot them.
use crate::{
    ordinal::{
        core::{
            data::OrdinalData,
            options::{FitOptions, SimOpts},
            probabilities::CategoryProbabilities,
            simulation::{OrdinalSimulator, SimDesign},
            thresholds::Thresholds,
            validation::validate_alpha,
        },
        errors::OrdinalResult,
        models::{CumulativeLogitModel, FittedModel},
    },
    statistical_tests::brant::{PoTestResult, brant_test},
};
use tracing::{info, info_span};

/// One data-generating process plus the settings to simulate and fit it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub design: SimDesign,
    pub sim: SimOpts,
    pub fit: FitOptions,
}

impl Scenario {
    pub fn new(name: impl Into<String>, design: SimDesign, sim: SimOpts, fit: FitOptions) -> Self {
        Self { name: name.into(), design, sim, fit }
    }
}

/// Everything one scenario produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    pub thresholds: Thresholds,
    pub data: OrdinalData,
    pub fitted: FittedModel,
    pub po_test: PoTestResult,
}

impl ScenarioReport {
    /// Whether the omnibus Brant test rejects proportional odds at `alpha`.
    ///
    /// # Errors
    /// - `InvalidAlpha` unless `0 < alpha < 1`.
    pub fn rejects_po(&self, alpha: f64) -> OrdinalResult<bool> {
        validate_alpha(alpha)?;
        Ok(self.po_test.omnibus.p_value < alpha)
    }
}

/// The proportional and the perturbed run of the same baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioContrast {
    pub proportional: ScenarioReport,
    pub non_proportional: ScenarioReport,
}

/// Simulate, fit, and test one scenario.
///
/// # Errors
/// - Any error from simulation, fitting, or the Brant test.
pub fn run_scenario(scenario: &Scenario) -> OrdinalResult<ScenarioReport> {
    let _span = info_span!(
        "scenario",
        name = %scenario.name,
        n_subjects = scenario.sim.n_subjects,
        proportional = scenario.design.is_proportional()
    )
    .entered();

    let thresholds = scenario.design.baseline_thresholds().clone();
    let data = OrdinalSimulator::new(scenario.design.clone(), scenario.sim).simulate()?.data;
    info!(counts = ?data.category_counts(), "simulated sample");

    let fitted = CumulativeLogitModel::for_data(&data, scenario.fit.clone())?.fit(&data)?;
    info!(slopes = ?fitted.slopes.to_vec(), intercepts = ?fitted.intercepts.to_vec(), "fitted");

    let po_test = brant_test(&fitted, &data, &scenario.fit)?;
    info!(
        statistic = po_test.omnibus.statistic,
        df = po_test.omnibus.df,
        p_value = po_test.omnibus.p_value,
        "proportional-odds test"
    );

    Ok(ScenarioReport { name: scenario.name.clone(), thresholds, data, fitted, po_test })
}

/// Run the same baseline twice: without and with the exposed-only
/// threshold perturbation `non_proportional`.
///
/// # Errors
/// - Design validation errors and anything [`run_scenario`] reports.
pub fn contrast_scenarios(
    probabilities: CategoryProbabilities, adjustment_coefficient: f64,
    non_proportional: Vec<f64>, sim: SimOpts, fit: FitOptions,
) -> OrdinalResult<ScenarioContrast> {
    let po = SimDesign::proportional(probabilities.clone(), adjustment_coefficient)?;
    let npo = SimDesign::new(probabilities, adjustment_coefficient, Some(non_proportional))?;
    let proportional = run_scenario(&Scenario::new("proportional", po, sim, fit.clone()))?;
    let non_proportional = run_scenario(&Scenario::new("non-proportional", npo, sim, fit))?;
    Ok(ScenarioContrast { proportional, non_proportional })
}
