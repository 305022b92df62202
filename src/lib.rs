//! Benchdiff - statistical benchmark regression detection
//!
//! This library compares a candidate benchmark run against a baseline run,
//! flags benchmarks that are both materially and significantly slower
//! (one-sided Welch's t-test), renders the result as a Markdown report with a
//! stable identity marker, and publishes it idempotently as a review comment.

pub mod cli;
pub mod json_output;
pub mod publish;
pub mod regression;
pub mod report;
pub mod summary;
