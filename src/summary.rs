//! Benchmark summaries and measurement sets
//!
//! A measurement set is one run's worth of aggregated benchmark statistics,
//! as emitted by the benchmark producer in JSON:
//!
//! ```json
//! [{"name": "bench/foo", "avg": 1.2, "stddev": 0.05, "count": 10,
//!   "displayName": "Latency", "unitOfMeasurement": "ms"}]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a measurement set
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Expected a JSON array of benchmark entries, found {0}")]
    NotAnArray(&'static str),

    #[error("Malformed benchmark entry #{index}{}: {source}", describe_name(.name))]
    MalformedEntry {
        index: usize,
        name: Option<String>,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed benchmark entry #{index}: field `name` must not be empty")]
    EmptyName { index: usize },
}

fn describe_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" (\"{}\")", name),
        None => String::new(),
    }
}

/// One named benchmark's aggregated statistics from a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub name: String,

    /// Group label, e.g. "Latency"
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,

    /// Unit label, e.g. "ms"
    #[serde(
        rename = "unitOfMeasurement",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,

    #[serde(rename = "avg")]
    pub mean: f64,

    /// Sample standard deviation, only meaningful when `count >= 2`
    #[serde(default)]
    pub stddev: f64,

    pub count: u64,
}

impl BenchmarkSummary {
    pub fn new(name: impl Into<String>, mean: f64, stddev: f64, count: u64) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            unit: None,
            mean,
            stddev,
            count,
        }
    }

    pub fn with_group(mut self, display_name: impl Into<String>, unit: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self.unit = Some(unit.into());
        self
    }

    /// Whether this summary carries enough samples for a t-test
    pub fn supports_inference(&self) -> bool {
        self.count >= 2
    }
}

/// A collection of benchmark summaries from one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    entries: Vec<BenchmarkSummary>,
}

impl MeasurementSet {
    pub fn new(entries: Vec<BenchmarkSummary>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of benchmark entries
    ///
    /// Each entry is decoded on its own so that a missing field is reported
    /// together with the position and name of the offending entry.
    pub fn from_json_str(input: &str) -> Result<Self, InputError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(InputError::InvalidJson)?;

        let items = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(_) => return Err(InputError::NotAnArray("an object")),
            serde_json::Value::Null => return Err(InputError::NotAnArray("null")),
            serde_json::Value::Bool(_) => return Err(InputError::NotAnArray("a boolean")),
            serde_json::Value::Number(_) => return Err(InputError::NotAnArray("a number")),
            serde_json::Value::String(_) => return Err(InputError::NotAnArray("a string")),
        };

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let name = item
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_string);

            let summary: BenchmarkSummary = serde_json::from_value(item)
                .map_err(|source| InputError::MalformedEntry {
                    index,
                    name,
                    source,
                })?;

            if summary.name.is_empty() {
                return Err(InputError::EmptyName { index });
            }
            entries.push(summary);
        }

        Ok(Self { entries })
    }

    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let contents = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn entries(&self) -> &[BenchmarkSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name index over the entries; later duplicates win
    pub fn index(&self) -> HashMap<&str, &BenchmarkSummary> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            index.insert(entry.name.as_str(), entry);
        }
        index
    }
}

impl FromIterator<BenchmarkSummary> for MeasurementSet {
    fn from_iter<I: IntoIterator<Item = BenchmarkSummary>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
