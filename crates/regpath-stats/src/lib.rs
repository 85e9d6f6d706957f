//! Descriptive statistics and the one-sided z-test used to compare real
//! regression scores against a null distribution from randomized runs.
//!
//! Standard deviations are population (ddof = 0) values and means of empty
//! slices are reported as 0.0 rather than NaN.

use statrs::distribution::{ContinuousCDF, Normal};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a lower-tail z-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZTestResult {
    /// The z statistic, `None` when the null distribution is degenerate.
    pub statistic: Option<f64>,
    pub standard_error: f64,
    pub p_value: f64,
}

impl ZTestResult {
    /// True when the p-value clears `threshold` (inclusive).
    pub fn significant_at(&self, threshold: f64) -> bool {
        self.p_value <= threshold
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Descriptive statistics
// ═══════════════════════════════════════════════════════════════════════════════

/// Arithmetic mean. Empty input yields 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Standard error of a mean with standard deviation `sd` over `n` draws.
pub fn standard_error(sd: f64, n: usize) -> f64 {
    sd / (n as f64).sqrt()
}

/// Per-test significance threshold after Bonferroni correction.
///
/// With zero tests there is nothing to correct, so `alpha` is returned as-is.
pub fn bonferroni_threshold(alpha: f64, tests: usize) -> f64 {
    if tests == 0 {
        return alpha;
    }
    alpha / tests as f64
}

// ═══════════════════════════════════════════════════════════════════════════════
// Hypothesis tests
// ═══════════════════════════════════════════════════════════════════════════════

/// Standard normal cumulative distribution function.
pub fn normal_cdf(z: f64) -> f64 {
    Normal::standard().cdf(z)
}

/// One-sided lower-tail z-test: is `observed` (a mean with standard deviation
/// `sd` over `n` draws) below `reference`?
///
/// The p-value is the area left of `z = (observed - reference) / se`, so
/// small values mean the observed mean sits well below the reference.
///
/// A null distribution with `sd == 0` carries no spread to test against and
/// is reported as `p = 0.0`, whatever the observed value.
pub fn lower_tail_z_test(observed: f64, reference: f64, sd: f64, n: usize) -> ZTestResult {
    let se = standard_error(sd, n);
    if sd > 0.0 {
        let z = (observed - reference) / se;
        ZTestResult {
            statistic: Some(z),
            standard_error: se,
            p_value: normal_cdf(z),
        }
    } else {
        ZTestResult {
            statistic: None,
            standard_error: se,
            p_value: 0.0,
        }
    }
}
