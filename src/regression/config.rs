// Configuration for benchmark regression detection
//
// A regression requires BOTH a material slowdown (threshold_fraction) and
// statistical significance (significance_level).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid regression configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("significance_level (alpha) must be in (0, 1), got {0}")]
    SignificanceLevel(f64),

    #[error("threshold_fraction must be a finite, non-negative fraction, got {0}")]
    ThresholdFraction(f64),
}

/// What to do with candidate benchmarks that have no baseline counterpart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedPolicy {
    /// Drop unmatched candidates from the report
    Skip,
    /// Compare unmatched candidates against themselves (neutral row)
    #[default]
    SelfFallback,
}

impl UnmatchedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnmatchedPolicy::Skip => "skip",
            UnmatchedPolicy::SelfFallback => "self-fallback",
        }
    }
}

/// Configuration for benchmark regression detection
///
/// # Example
/// ```
/// use benchdiff::regression::RegressionConfig;
///
/// let config = RegressionConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.threshold_fraction, 0.15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionConfig {
    /// Minimum relative slowdown to report, as a fraction (0.15 = 15%)
    ///
    /// Keeps statistically detectable but immaterial slowdowns out of the
    /// regression list.
    pub threshold_fraction: f64,

    /// Significance level (alpha) for the one-sided Welch's t-test
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter, fewer false positives
    pub significance_level: f64,

    /// Handling of candidate entries missing from the baseline
    pub unmatched: UnmatchedPolicy,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.15,
            significance_level: 0.05,
            unmatched: UnmatchedPolicy::SelfFallback,
        }
    }
}

impl RegressionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigError::SignificanceLevel(self.significance_level));
        }

        if !self.threshold_fraction.is_finite() || self.threshold_fraction < 0.0 {
            return Err(ConfigError::ThresholdFraction(self.threshold_fraction));
        }

        Ok(())
    }
}
