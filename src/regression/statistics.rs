// Significance testing for benchmark summaries
//
// Benchmarks arrive pre-aggregated (mean, stddev, count), so Welch's t-test is
// computed from summary statistics rather than raw samples:
//
//   se² = s_a²/n_a + s_b²/n_b
//   t   = (mean_a - mean_b) / se
//   df  = se⁴ / ((s_a²/n_a)²/(n_a-1) + (s_b²/n_b)²/(n_b-1))   (Welch-Satterthwaite)
//
// The two-sided p-value comes from statrs' Student's t CDF and is folded into
// a one-sided p-value for "candidate is slower than baseline".

use crate::summary::BenchmarkSummary;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of Welch's unequal-variance t-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTest {
    /// t-statistic, positive when the candidate mean is higher (slower)
    pub statistic: f64,

    /// Welch-Satterthwaite degrees of freedom
    pub df: f64,

    /// Two-sided p-value
    pub pvalue: f64,
}

impl WelchTest {
    /// One-sided p-value for the alternative "candidate is slower"
    pub fn one_sided_slower(&self) -> f64 {
        if self.statistic == 0.0 {
            // No difference in means carries no evidence of slowdown
            1.0
        } else if self.statistic > 0.0 {
            self.pvalue / 2.0
        } else {
            1.0 - self.pvalue / 2.0
        }
    }
}

/// Relative slowdown and significance of one candidate/baseline pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Significance {
    /// `(candidate - baseline) / baseline`, `f64::INFINITY` if baseline mean is 0
    pub relative_delta: f64,

    /// One-sided p-value, absent when either side has fewer than 2 samples
    pub pvalue: Option<f64>,
}

/// Relative change of the candidate mean over the baseline mean
///
/// A zero baseline has no meaningful ratio and yields `f64::INFINITY`.
pub fn relative_delta(candidate_mean: f64, baseline_mean: f64) -> f64 {
    if baseline_mean == 0.0 {
        f64::INFINITY
    } else {
        (candidate_mean - baseline_mean) / baseline_mean
    }
}

/// Welch's t-test from summary statistics
///
/// Returns `None` when either side has fewer than 2 samples. Degenerate
/// inputs resolve to limiting values:
/// - equal means: t = 0, p = 1
/// - zero combined variance with differing means: t = ±∞, p = 0
pub fn welch_t_test(candidate: &BenchmarkSummary, baseline: &BenchmarkSummary) -> Option<WelchTest> {
    if !(candidate.supports_inference() && baseline.supports_inference()) {
        return None;
    }

    let n_a = candidate.count as f64;
    let n_b = baseline.count as f64;
    let var_a = candidate.stddev * candidate.stddev / n_a;
    let var_b = baseline.stddev * baseline.stddev / n_b;
    let se_squared = var_a + var_b;
    let diff = candidate.mean - baseline.mean;

    if diff == 0.0 {
        return Some(WelchTest {
            statistic: 0.0,
            df: (n_a + n_b - 2.0).max(1.0),
            pvalue: 1.0,
        });
    }

    if se_squared == 0.0 {
        return Some(WelchTest {
            statistic: diff.signum() * f64::INFINITY,
            df: n_a + n_b - 2.0,
            pvalue: 0.0,
        });
    }

    let statistic = diff / se_squared.sqrt();
    let df = satterthwaite_df(var_a, var_b, n_a, n_b);

    Some(WelchTest {
        statistic,
        df,
        pvalue: two_sided_pvalue(statistic, df),
    })
}

// Weights are normalized by se² before squaring so tiny variances do not
// underflow to 0/0. The result lies in [min(n_a, n_b) - 1, n_a + n_b - 2].
fn satterthwaite_df(var_a: f64, var_b: f64, n_a: f64, n_b: f64) -> f64 {
    let se_squared = var_a + var_b;
    let w_a = var_a / se_squared;
    let w_b = var_b / se_squared;
    let df = 1.0 / (w_a * w_a / (n_a - 1.0) + w_b * w_b / (n_b - 1.0));

    if df.is_finite() && df > 0.0 {
        df
    } else {
        n_a.min(n_b) - 1.0
    }
}

// Lower tail of -|t| keeps precision for large statistics where
// `1 - cdf(|t|)` rounds to zero.
fn two_sided_pvalue(statistic: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.cdf(-statistic.abs())).clamp(0.0, 1.0),
        Err(e) => {
            tracing::warn!("Cannot build t-distribution (df={}): {}", df, e);
            1.0
        }
    }
}

/// Relative delta and one-sided p-value for a matched pair
///
/// # Example
/// ```
/// use benchdiff::regression::compare_summaries;
/// use benchdiff::summary::BenchmarkSummary;
///
/// let candidate = BenchmarkSummary::new("parse", 1.20, 0.05, 10);
/// let baseline = BenchmarkSummary::new("parse", 1.00, 0.05, 10);
///
/// let result = compare_summaries(&candidate, &baseline);
/// assert!((result.relative_delta - 0.20).abs() < 1e-9);
/// assert!(result.pvalue.unwrap() < 0.05);
/// ```
pub fn compare_summaries(candidate: &BenchmarkSummary, baseline: &BenchmarkSummary) -> Significance {
    let relative_delta = relative_delta(candidate.mean, baseline.mean);

    let pvalue = welch_t_test(candidate, baseline).map(|test| test.one_sided_slower());

    Significance {
        relative_delta,
        pvalue,
    }
}
