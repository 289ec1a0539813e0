//! Numerically stable scalar transforms for logistic models.
//!
//! Naive forms of these functions overflow for large `|x|` or cancel
//! catastrophically near the tails. The guarded versions below keep `f64`
//! arithmetic well conditioned over the whole real line, using the
//! `x > 20.0` cutoff common in ML libraries for softplus.

/// Eigenvalues at or below this are treated as zero when pseudo-inverting
/// an information matrix.
pub const EIGEN_EPS: f64 = 1e-12;

/// Softplus `ln(1 + eˣ)`, mapping ℝ → (0, ∞) without overflow.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x + (-x).exp().ln_1p() } else { x.exp().ln_1p() }
}

/// Inverse softplus `ln(eˣ − 1)` on `(0, ∞)`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x + (-(-x).exp()).ln_1p() } else { x.exp_m1().ln() }
}

/// Standard logistic CDF `1 / (1 + e⁻ˣ)`.
///
/// Evaluated through `e^{-|x|}` so neither tail overflows. This is also the
/// derivative of [`safe_softplus`].
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Standard logistic density `F(x)(1 − F(x))`.
pub fn logistic_density(x: f64) -> f64 {
    let e = (-x.abs()).exp();
    e / ((1.0 + e) * (1.0 + e))
}

/// `ln F(x)` for the standard logistic CDF; `-∞` at `x = -∞`.
pub fn log_logistic(x: f64) -> f64 {
    -safe_softplus(-x)
}

/// `ln(1 − F(x))` for the standard logistic CDF; `-∞` at `x = +∞`.
pub fn log_logistic_complement(x: f64) -> f64 {
    -safe_softplus(x)
}

/// Log-odds `ln(p / (1 − p))`, the standard logistic quantile function.
pub fn logit(p: f64) -> f64 {
    p.ln() - (-p).ln_1p()
}

/// `ln(F(upper) − F(lower))` for `lower < upper`.
///
/// Either bound may be infinite (`lower = -∞` or `upper = +∞`), which is how
/// the first and last ordinal categories are expressed. Interior intervals
/// use `F(a) − F(b) = F(a)(1 − F(b))(1 − e^{b−a})`, which stays accurate when
/// both bounds sit deep in the same tail.
pub fn log_logistic_interval(upper: f64, lower: f64) -> f64 {
    match (upper.is_finite(), lower.is_finite()) {
        (true, false) => log_logistic(upper),
        (false, true) => log_logistic_complement(lower),
        (false, false) => 0.0,
        (true, true) => {
            log_logistic(upper) + log_logistic_complement(lower) + (-(lower - upper).exp_m1()).ln()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Agreement with naive formulas on a safe grid, tail behavior, and the
    // softplus / logistic / logit inverse relationships.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Stable forms match naive formulas where the latter are safe.
    //
    // Given
    // -----
    // - x on a grid in [-10, 10].
    //
    // Expect
    // ------
    // - softplus, logistic, density, and log-CDF agree to 1e-12 relative.
    fn stable_forms_match_naive_formulas_on_safe_grid() {
        for k in -20..=20 {
            let x = k as f64 * 0.5;
            let f = 1.0 / (1.0 + (-x).exp());
            assert_relative_eq!(safe_softplus(x), (1.0 + x.exp()).ln(), max_relative = 1e-12);
            assert_relative_eq!(safe_logistic(x), f, max_relative = 1e-12);
            assert_relative_eq!(logistic_density(x), f * (1.0 - f), max_relative = 1e-10);
            assert_relative_eq!(log_logistic(x), f.ln(), max_relative = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Inverse pairs compose to the identity.
    //
    // Given
    // -----
    // - Positive x for softplus, p ∈ (0, 1) for logit.
    //
    // Expect
    // ------
    // - softplus(softplus⁻¹(x)) = x and F(logit(p)) = p.
    fn inverse_pairs_compose_to_identity() {
        for &x in &[1e-6, 0.3, 2.0, 19.9, 25.0, 80.0] {
            assert_relative_eq!(safe_softplus(safe_softplus_inv(x)), x, max_relative = 1e-10);
        }
        for &p in &[1e-9, 0.01, 0.5, 0.79, 0.999_999] {
            assert_relative_eq!(safe_logistic(logit(p)), p, max_relative = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Interval probabilities are accurate in the tails and at the boundaries.
    //
    // Given
    // -----
    // - A deep-tail interval (-40, -39), a central interval (-0.5, 1.0), and
    //   the half-infinite intervals.
    //
    // Expect
    // ------
    // - Finite logs that match direct evaluation where it is accurate.
    fn log_logistic_interval_handles_tails_and_boundaries() {
        // Arrange
        let central = (safe_logistic(1.0) - safe_logistic(-0.5)).ln();
        let deep = (-39.0_f64).exp() - (-40.0_f64).exp();

        // Act + Assert
        assert_relative_eq!(log_logistic_interval(1.0, -0.5), central, max_relative = 1e-12);
        assert_relative_eq!(log_logistic_interval(-39.0, -40.0), deep.ln(), max_relative = 1e-9);
        assert_relative_eq!(
            log_logistic_interval(0.3, f64::NEG_INFINITY),
            safe_logistic(0.3).ln(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            log_logistic_interval(f64::INFINITY, 0.3),
            (1.0 - safe_logistic(0.3)).ln(),
            max_relative = 1e-12
        );
        assert!(log_logistic_interval(-800.0, f64::NEG_INFINITY).is_finite());
    }
}
