//! CLI argument parsing and configuration layering for benchdiff
//!
//! Precedence: command-line flags, then environment (publishing only), then
//! the optional TOML config file, then built-in defaults.

use crate::publish::GitHubTarget;
use crate::regression::{RegressionConfig, UnmatchedPolicy};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Title used when neither the CLI nor the config file sets one
pub const DEFAULT_TITLE: &str = "Benchmark comparison";

/// Output format for the rendered comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown report (default, also what gets published)
    #[default]
    Markdown,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "benchdiff")]
#[command(version)]
#[command(
    about = "Detect statistically significant benchmark regressions and report them",
    long_about = None
)]
pub struct Cli {
    /// Benchmark summaries of the run under evaluation (JSON array)
    #[arg(long, value_name = "PATH")]
    pub candidate: PathBuf,

    /// Benchmark summaries of the reference run (JSON array)
    #[arg(long, value_name = "PATH")]
    pub baseline: PathBuf,

    /// Report title, also the key for updating a previously posted report
    #[arg(long)]
    pub title: Option<String>,

    /// Minimum relative slowdown to flag, as a fraction (default: 0.15)
    #[arg(long, value_name = "FRACTION")]
    pub threshold: Option<f64>,

    /// Significance level for the one-sided Welch's t-test (default: 0.05)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Handling of benchmarks missing from the baseline (default: self-fallback)
    #[arg(long, value_enum)]
    pub unmatched: Option<UnmatchedPolicy>,

    /// TOML file with title, threshold, alpha and unmatched settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format written to stdout
    #[arg(long = "format", value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// Exit with status 2 when any regression is detected
    #[arg(long = "fail-on-regression")]
    pub fail_on_regression: bool,

    /// Repository (owner/name) whose pull request receives the report
    #[arg(long = "github-repo", env = "GITHUB_REPOSITORY")]
    pub github_repo: Option<String>,

    /// Pull request or issue number to comment on
    #[arg(long = "github-issue", value_name = "NUMBER")]
    pub github_issue: Option<u64>,

    /// Token used to authenticate against the GitHub API
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub API root
    #[arg(
        long = "github-api-url",
        env = "GITHUB_API_URL",
        default_value = "https://api.github.com"
    )]
    pub github_api_url: String,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

/// Settings accepted in the TOML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub title: Option<String>,
    pub threshold: Option<f64>,
    pub alpha: Option<f64>,
    pub unmatched: Option<UnmatchedPolicy>,
}

impl FileConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("Invalid config file")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

impl Cli {
    /// Merge flags over the config file over defaults
    pub fn resolve(&self, file: &FileConfig) -> (String, RegressionConfig) {
        let defaults = RegressionConfig::default();
        let title = self
            .title
            .clone()
            .or_else(|| file.title.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let config = RegressionConfig {
            threshold_fraction: self
                .threshold
                .or(file.threshold)
                .unwrap_or(defaults.threshold_fraction),
            significance_level: self
                .alpha
                .or(file.alpha)
                .unwrap_or(defaults.significance_level),
            unmatched: self.unmatched.or(file.unmatched).unwrap_or(defaults.unmatched),
        };

        (title, config)
    }

    /// Load the config file, if any, and resolve the effective settings
    pub fn load_settings(&self) -> Result<(String, RegressionConfig)> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let (title, config) = self.resolve(&file);
        config.validate()?;
        Ok((title, config))
    }

    /// GitHub target and token, when publishing was requested
    ///
    /// Publishing is keyed on `--github-issue`; the repository usually comes
    /// from `GITHUB_REPOSITORY` in CI.
    pub fn github_target(&self) -> Result<Option<(GitHubTarget, String)>> {
        let Some(issue) = self.github_issue else {
            return Ok(None);
        };
        let repo = self
            .github_repo
            .as_deref()
            .context("--github-issue requires --github-repo or GITHUB_REPOSITORY")?;
        let token = self
            .github_token
            .clone()
            .context("--github-issue requires --github-token or GITHUB_TOKEN")?;

        // A bad target is a configuration error, not a publication failure
        let target = GitHubTarget::new(&self.github_api_url, repo, issue)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Ok(Some((target, token)))
    }
}
