// Regression verdicts for matched benchmark pairs
//
// This module integrates:
// - Matching (candidate ↔ baseline by name)
// - Significance testing (one-sided Welch's t-test)
// - Classification (magnitude AND significance)
//
// to produce one immutable ComparisonRecord per candidate benchmark.

use crate::regression::config::{ConfigError, RegressionConfig};
use crate::regression::matcher::match_entries;
use crate::regression::statistics::compare_summaries;
use crate::summary::MeasurementSet;
use serde::Serialize;

/// Outcome of comparing one candidate benchmark against its baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub name: String,
    pub display_name: Option<String>,
    pub unit: Option<String>,
    pub candidate_mean: f64,
    pub baseline_mean: f64,

    /// `f64::INFINITY` when the baseline mean is zero
    pub relative_delta: f64,

    /// One-sided p-value for "candidate is slower"
    pub pvalue: Option<f64>,

    pub is_regression: bool,
}

/// All records produced by one evaluation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Records in candidate order
    pub records: Vec<ComparisonRecord>,

    /// Candidate names without a baseline that were left out
    pub skipped: Vec<String>,

    /// Configuration used for the evaluation
    pub config: RegressionConfig,
}

impl Evaluation {
    pub fn regressions(&self) -> impl Iterator<Item = &ComparisonRecord> {
        self.records.iter().filter(|r| r.is_regression)
    }

    pub fn regression_count(&self) -> usize {
        self.regressions().count()
    }

    pub fn has_regressions(&self) -> bool {
        self.records.iter().any(|r| r.is_regression)
    }
}

/// Binary regression verdict
///
/// Both a material slowdown and statistical significance are required; a
/// missing p-value never yields a regression.
pub fn classify(
    relative_delta: f64,
    pvalue: Option<f64>,
    threshold_fraction: f64,
    significance_level: f64,
) -> bool {
    match pvalue {
        Some(p) => p < significance_level && relative_delta >= threshold_fraction,
        None => false,
    }
}

/// Compare a candidate run against a baseline run
///
/// # Example
/// ```
/// use benchdiff::regression::{evaluate, RegressionConfig};
/// use benchdiff::summary::{BenchmarkSummary, MeasurementSet};
///
/// let candidate = MeasurementSet::new(vec![BenchmarkSummary::new("parse", 1.20, 0.05, 10)]);
/// let baseline = MeasurementSet::new(vec![BenchmarkSummary::new("parse", 1.00, 0.05, 10)]);
///
/// let evaluation = evaluate(&candidate, &baseline, &RegressionConfig::default()).unwrap();
/// assert!(evaluation.records[0].is_regression);
/// ```
pub fn evaluate(
    candidate: &MeasurementSet,
    baseline: &MeasurementSet,
    config: &RegressionConfig,
) -> Result<Evaluation, ConfigError> {
    config.validate()?;

    let outcome = match_entries(candidate, baseline, config.unmatched);

    let records = outcome
        .pairs
        .iter()
        .map(|pair| {
            let significance = compare_summaries(pair.candidate, pair.baseline);
            let is_regression = classify(
                significance.relative_delta,
                significance.pvalue,
                config.threshold_fraction,
                config.significance_level,
            );

            tracing::debug!(
                "{}: delta={} p={:?} regression={}",
                pair.candidate.name,
                significance.relative_delta,
                significance.pvalue,
                is_regression
            );

            ComparisonRecord {
                name: pair.candidate.name.clone(),
                display_name: pair.candidate.display_name.clone(),
                unit: pair.candidate.unit.clone(),
                candidate_mean: pair.candidate.mean,
                baseline_mean: pair.baseline.mean,
                relative_delta: significance.relative_delta,
                pvalue: significance.pvalue,
                is_regression,
            }
        })
        .collect();

    Ok(Evaluation {
        records,
        skipped: outcome.skipped.iter().map(|s| s.to_string()).collect(),
        config: config.clone(),
    })
}
