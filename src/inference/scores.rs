//! inference::scores: covariance of per-observation scores.
//!
//! Subjects in an ordinal sample are independent, so the score covariance
//! is the IID outer product of gradients (OPG), `S = (1/n) Σ_i s_i s_iᵀ`,
//! on the average log-likelihood scale.
use ndarray::Array2;

/// `(1/n) SᵀS` for an `n × k` score matrix. Scores are not centered; at the
/// MLE their mean is zero up to optimizer tolerance.
pub fn iid_score_covariance(scores: &Array2<f64>) -> Array2<f64> {
    let n = scores.nrows().max(1) as f64;
    scores.t().dot(scores) / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The OPG matches a hand computation.
    //
    // Given
    // -----
    // - Scores rows (1, 0), (−1, 2).
    //
    // Expect
    // ------
    // - S = [[1, −1], [−1, 2]].
    fn iid_score_covariance_matches_hand_computation() {
        let s = iid_score_covariance(&array![[1.0, 0.0], [-1.0, 2.0]]);
        assert_abs_diff_eq!(s[[0, 0]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(s[[0, 1]], -1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(s[[1, 0]], -1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(s[[1, 1]], 2.0, epsilon = 1e-15);
    }
}
