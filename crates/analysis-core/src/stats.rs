//! Small statistics helpers shared by the scoring crates.
//!
//! Everything here is total: empty or degenerate input yields `0.0` rather than
//! NaN, so callers can feed the results straight into scoring rules.

use statrs::statistics::Statistics;

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().mean()
}

/// Compute sample standard deviation (n - 1 denominator).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    data.iter().std_dev()
}

/// Compute population standard deviation (n denominator).
pub fn population_std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().population_std_dev()
}

/// Period-over-period fractional changes. A zero previous value produces no
/// entry instead of an infinity.
pub fn pct_changes(data: &[f64]) -> Vec<f64> {
    data.windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Replace NaN and infinities with zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
