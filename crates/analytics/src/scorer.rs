use core_types::{PeriodReturns, RsWeights, RS_WEIGHTS};

/// The RS score for a vector of benchmark-relative returns, using the fixed
/// production weights: `RS = 2*rel_3m + rel_6m + rel_9m + rel_12m`.
///
/// The output is unbounded and unclamped; ranking happens separately.
pub fn rs_score(relative: &PeriodReturns) -> f64 {
    weighted_score(relative, &RS_WEIGHTS)
}

/// The weighted sum underlying `rs_score`, parameterized over the weight
/// set so tests can substitute synthetic weights.
pub fn weighted_score(relative: &PeriodReturns, weights: &RsWeights) -> f64 {
    weights.m3 * relative.m3
        + weights.m6 * relative.m6
        + weights.m9 * relative.m9
        + weights.m12 * relative.m12
}
