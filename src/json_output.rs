//! JSON output format for comparison results
//!
//! Mirrors the Markdown report for machine consumers. A non-finite relative
//! delta (zero baseline mean) serializes as `null`.

use crate::regression::{ComparisonRecord, Evaluation};
use crate::report::id_marker;
use serde::Serialize;

/// Complete JSON output
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub title: &'a str,
    pub id_marker: String,
    pub threshold: f64,
    pub alpha: f64,
    pub unmatched: &'static str,
    /// Number of records flagged as regressions
    pub regressions: usize,
    #[serde(skip_serializing_if = "slice_is_empty")]
    pub skipped: &'a [String],
    pub records: &'a [ComparisonRecord],
}

fn slice_is_empty(items: &&[String]) -> bool {
    items.is_empty()
}

impl<'a> JsonReport<'a> {
    pub fn new(title: &'a str, evaluation: &'a Evaluation) -> Self {
        Self {
            title,
            id_marker: id_marker(title),
            threshold: evaluation.config.threshold_fraction,
            alpha: evaluation.config.significance_level,
            unmatched: evaluation.config.unmatched.as_str(),
            regressions: evaluation.regression_count(),
            skipped: &evaluation.skipped,
            records: &evaluation.records,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
