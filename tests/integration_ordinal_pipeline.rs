//! Integration tests for the ordinal pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end workflow: from category probabilities, through
//!   threshold derivation and latent-logistic simulation, to the
//!   cumulative-logit fit and the Brant proportional-odds test.
//! - Exercise realistic sample sizes where the asymptotics the test relies
//!   on are expected to hold.
//!
//! Coverage
//! --------
//! - `ordinal::core`: `derive_thresholds`, `SimDesign`, `OrdinalSimulator`.
//! - `ordinal::models`: `CumulativeLogitModel::fit`, classical and robust
//!   standard errors, coefficient tables.
//! - `statistical_tests::brant`: size under proportional odds and power
//!   against a single perturbed threshold.
//! - `pipeline`: `run_scenario` on a named scenario.
//!
//! Exclusions
//! ----------
//! - Validation of individual inputs; covered by unit tests.
//! - Python bindings; exercised from the Python package.
use approx::assert_abs_diff_eq;
use rust_ordinal::{
    optimization::loglik_optimizer::{MLEOptions, Tolerances, traits::LineSearcher},
    ordinal::{
        core::{
            CategoryProbabilities, CovarianceKind, FitOptions, OrdinalData, OrdinalSimulator,
            SimDesign, SimOpts, derive_thresholds,
        },
        models::CumulativeLogitModel,
    },
    pipeline::{Scenario, run_scenario},
    statistical_tests::brant_test,
};
use tracing_subscriber::EnvFilter;

const SLOPE: f64 = 0.7;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn grades() -> CategoryProbabilities {
    CategoryProbabilities::new(vec![0.01, 0.03, 0.32, 0.43, 0.21]).expect("valid probabilities")
}

fn simulate(design: SimDesign, n: usize, seed: u64) -> OrdinalData {
    let opts = SimOpts::new(n, 0.5, Some(seed), false).expect("valid options");
    OrdinalSimulator::new(design, opts).simulate().expect("simulation succeeds").data
}

#[test]
// Purpose
// -------
// Thresholds for the five-grade distribution match the closed form.
//
// Given
// -----
// - Probabilities (0.01, 0.03, 0.32, 0.43, 0.21).
//
// Expect
// ------
// - Cut-points logit(0.01), logit(0.04), logit(0.36), logit(0.79).
fn thresholds_for_grade_distribution() {
    let thresholds = derive_thresholds(&grades()).expect("valid");
    let expected = [-4.59512, -3.17805, -0.575364, 1.32493];
    assert_eq!(thresholds.len(), 4);
    for (got, want) in thresholds.values().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-5);
    }
}

#[test]
// Purpose
// -------
// Under proportional odds the fit recovers the simulated slope and the
// baseline thresholds.
//
// Given
// -----
// - 25,000 subjects, slope 0.7, half exposed.
//
// Expect
// ------
// - |β̂ − 0.7| < 0.05 and within four standard errors.
// - Intercepts within 0.25 of the baseline thresholds (the first cut sits
//   on about 1% of the sample, so it is the noisiest).
// - The optimizer reports convergence.
fn proportional_fit_recovers_parameters() {
    init_tracing();

    // Arrange
    let design = SimDesign::proportional(grades(), SLOPE).expect("valid design");
    let baseline = design.baseline_thresholds().clone();
    let data = simulate(design, 25_000, 11);

    // Act
    let fitted = CumulativeLogitModel::for_data(&data, FitOptions::default())
        .expect("J = 5")
        .fit(&data)
        .expect("fit succeeds");

    // Assert
    let beta = fitted.slopes[0];
    let se = fitted.std_errors[4];
    assert!(fitted.optim.converged, "status {}", fitted.optim.status);
    assert!((beta - SLOPE).abs() < 0.05, "slope {beta}");
    assert!((beta - SLOPE).abs() < 4.0 * se, "slope {beta} with SE {se}");
    for (alpha, truth) in fitted.intercepts.iter().zip(baseline.values()) {
        assert!((alpha - truth).abs() < 0.25, "intercept {alpha} vs {truth}");
    }
    let table = fitted.coefficients().expect("normal reference");
    assert_eq!(table.last().map(|r| r.term.as_str()), Some("exposed"));
    assert!(table.last().is_some_and(|r| r.p_value < 1e-10));
}

#[test]
// Purpose
// -------
// Classical and robust standard errors agree when the model is correct.
//
// Given
// -----
// - 20,000 subjects from a proportional design with four balanced
//   categories.
//
// Expect
// ------
// - Identical point estimates and slope SEs within 15% of each other.
fn robust_and_classical_errors_agree_under_correct_model() {
    // Arrange
    let probs = CategoryProbabilities::new(vec![0.2, 0.3, 0.3, 0.2]).expect("valid");
    let data = simulate(SimDesign::proportional(probs, SLOPE).expect("valid"), 20_000, 5);
    let robust_opts = FitOptions::new(MLEOptions::default(), CovarianceKind::Robust);

    // Act
    let classical = CumulativeLogitModel::for_data(&data, FitOptions::default())
        .expect("J = 4")
        .fit(&data)
        .expect("fit succeeds");
    let robust = CumulativeLogitModel::for_data(&data, robust_opts)
        .expect("J = 4")
        .fit(&data)
        .expect("fit succeeds");

    // Assert
    assert_abs_diff_eq!(classical.slopes[0], robust.slopes[0], epsilon = 1e-9);
    let ratio = robust.std_errors[3] / classical.std_errors[3];
    assert!((0.85..1.15).contains(&ratio), "SE ratio {ratio}");
    assert_eq!(robust.covariance_kind, CovarianceKind::Robust);
}

#[test]
// Purpose
// -------
// The Brant test holds its size under proportional odds.
//
// Given
// -----
// - Seven independent samples of 5,000 subjects, four balanced categories.
//
// Expect
// ------
// - At least five of seven omnibus p-values exceed 0.05.
fn brant_test_is_calibrated_under_the_null() {
    // Arrange
    let probs = CategoryProbabilities::new(vec![0.2, 0.3, 0.3, 0.2]).expect("valid");
    let design = SimDesign::proportional(probs, SLOPE).expect("valid");
    let options = FitOptions::default();

    // Act
    let p_values: Vec<f64> = (100..107)
        .map(|seed| {
            let data = simulate(design.clone(), 5_000, seed);
            let fitted = CumulativeLogitModel::for_data(&data, options.clone())
                .expect("J = 4")
                .fit(&data)
                .expect("fit succeeds");
            brant_test(&fitted, &data, &options).expect("test runs").omnibus.p_value
        })
        .collect();

    // Assert
    let retained = p_values.iter().filter(|&&p| p > 0.05).count();
    assert!(retained >= 5, "p-values {p_values:?}");
    assert!(p_values.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
// Purpose
// -------
// A perturbed upper threshold for exposed subjects is detected, and the
// pooled slope no longer equals the per-unit effect.
//
// Given
// -----
// - 25,000 subjects, slope 0.7, δ = (0, 0, −1.0) on the exposed.
//
// Expect
// ------
// - Omnibus p < 0.05 with (J − 2)·p = 3 degrees of freedom.
// - |β̂ − 0.7| > 0.15.
// - The binary slope at the third cut exceeds the one at the first.
fn brant_test_detects_non_proportional_odds() {
    init_tracing();

    // Arrange
    let design = SimDesign::new(grades(), SLOPE, Some(vec![0.0, 0.0, -1.0])).expect("valid");
    let data = simulate(design, 25_000, 23);
    let options = FitOptions::default();

    // Act
    let fitted = CumulativeLogitModel::for_data(&data, options.clone())
        .expect("J = 5")
        .fit(&data)
        .expect("fit succeeds");
    let test = brant_test(&fitted, &data, &options).expect("test runs");

    // Assert
    assert_eq!(test.omnibus.df, 3);
    assert!(test.omnibus.p_value < 0.05, "p = {}", test.omnibus.p_value);
    assert!((fitted.slopes[0] - SLOPE).abs() > 0.15, "pooled slope {}", fitted.slopes[0]);
    assert!(test.binary_slopes[[2, 0]] > test.binary_slopes[[0, 0]] + 0.5);
    assert!(test.row("exposed").is_some());
}

#[test]
// Purpose
// -------
// Fitting is deterministic and the line-search choice does not change the
// optimum.
//
// Given
// -----
// - One simulated sample fitted twice with More-Thuente and once with
//   Hager-Zhang.
//
// Expect
// ------
// - Bitwise equal repeated fits; the Hager-Zhang optimum within 1e-4.
fn fitting_is_idempotent() {
    // Arrange
    let data = simulate(SimDesign::proportional(grades(), SLOPE).expect("valid"), 8_000, 3);
    let model = CumulativeLogitModel::for_data(&data, FitOptions::default()).expect("J = 5");
    let hz = MLEOptions::new(
        Tolerances::new(Some(1e-8), None, Some(1_000)).expect("valid tolerances"),
        LineSearcher::HagerZhang,
        false,
        None,
    )
    .expect("valid options");
    let hz_model = CumulativeLogitModel::for_data(&data, FitOptions::new(hz, CovarianceKind::Classical))
        .expect("J = 5");

    // Act
    let first = model.fit(&data).expect("fit succeeds");
    let second = model.fit(&data).expect("fit succeeds");
    let third = hz_model.fit(&data).expect("fit succeeds");

    // Assert
    assert_eq!(first.intercepts, second.intercepts);
    assert_eq!(first.slopes, second.slopes);
    assert_abs_diff_eq!(first.slopes[0], third.slopes[0], epsilon = 1e-4);
}

#[test]
// Purpose
// -------
// A named scenario runs through the pipeline and keeps its intermediates.
//
// Given
// -----
// - The proportional grade scenario with 10,000 subjects.
//
// Expect
// ------
// - The report carries the baseline thresholds, a sample of the requested
//   size, and a five-category fit.
fn named_scenario_runs_end_to_end() {
    init_tracing();

    // Arrange
    let design = SimDesign::proportional(grades(), SLOPE).expect("valid");
    let sim = SimOpts::new(10_000, 0.5, Some(77), false).expect("valid");
    let scenario = Scenario::new("grades", design, sim, FitOptions::default());

    // Act
    let report = run_scenario(&scenario).expect("pipeline runs");

    // Assert
    assert_eq!(report.name, "grades");
    assert_eq!(report.data.n_obs(), 10_000);
    assert_eq!(report.fitted.n_categories, 5);
    assert_abs_diff_eq!(report.thresholds.values()[0], -4.59512, epsilon = 1e-5);
    assert_eq!(report.po_test.binary_fits.len(), 4);
}
