// Statistical Regression Detection for Benchmark Runs
//
// A candidate benchmark is a regression only when it is both materially slower
// than its baseline (relative delta >= threshold) and significantly slower
// under a one-sided Welch's t-test (p < alpha). Either condition alone is
// noise: tiny but detectable slowdowns, or large swings on few samples.
//
// Pipeline:
//   MeasurementSet x2 → match_entries → compare_summaries → classify → Evaluation
//
// Everything here is pure: no I/O, no shared state.

mod config;
mod matcher;
mod statistics;
mod verdict;

pub use config::{ConfigError, RegressionConfig, UnmatchedPolicy};
pub use matcher::{match_entries, MatchOutcome, MatchedPair};
pub use statistics::{compare_summaries, relative_delta, welch_t_test, Significance, WelchTest};
pub use verdict::{classify, evaluate, ComparisonRecord, Evaluation};
