//! Markdown report for a benchmark comparison
//!
//! The rendered document starts with an HTML comment carrying the report's
//! identity marker, so a previously posted report for the same title can be
//! found and replaced in place.

use crate::regression::{ComparisonRecord, Evaluation, RegressionConfig};

/// Rendering default for an absent display name, unit, delta or p-value
pub const NOT_APPLICABLE: &str = "N/A";

const MARKER_PREFIX: &str = "<!-- benchdiff-report: ";
const MARKER_SUFFIX: &str = " -->";

const STATUS_REGRESSION: &str = "❌ regression";
const STATUS_OK: &str = "✅ ok";

const TABLE_HEADER: &str = "| Status | Benchmark | Candidate | Baseline | Delta | p-value |";
const TABLE_RULE: &str = "| --- | --- | ---: | ---: | ---: | ---: |";

/// A rendered report and the marker identifying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub id_marker: String,
    pub body: String,
}

impl Report {
    /// Render an evaluation under `title`
    pub fn render(title: &str, evaluation: &Evaluation) -> Self {
        let body = render_document(
            title,
            &evaluation.records,
            &evaluation.config,
            evaluation.skipped.len(),
        );
        Self {
            title: title.to_string(),
            id_marker: id_marker(title),
            body,
        }
    }
}

/// Identity marker embedded as the first line of the report
///
/// A `-->` inside the title would close the HTML comment early, so it is
/// escaped.
pub fn id_marker(title: &str) -> String {
    format!(
        "{}{}{}",
        MARKER_PREFIX,
        title.replace("-->", "--&gt;"),
        MARKER_SUFFIX
    )
}

/// Render records into the full Markdown document
///
/// Records are sorted by `(display_name, unit, name)` and emitted as one
/// table per `(display_name, unit)` group.
pub fn render_document(
    title: &str,
    records: &[ComparisonRecord],
    config: &RegressionConfig,
    skipped: usize,
) -> String {
    let mut lines = vec![
        id_marker(title),
        format!("## {}", title),
        format!(
            "Regression threshold: {:.2}% | Significance level (alpha): {}",
            config.threshold_fraction * 100.0,
            config.significance_level
        ),
        summary_line(records, skipped),
    ];

    let mut sorted: Vec<&ComparisonRecord> = records.iter().collect();
    sorted.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

    let mut current_group: Option<(Option<&str>, Option<&str>)> = None;
    for record in sorted {
        let group = (record.display_name.as_deref(), record.unit.as_deref());
        if current_group != Some(group) {
            lines.push(String::new());
            lines.push(format!(
                "### {} ({})",
                escape_pipes(group.0.unwrap_or(NOT_APPLICABLE)),
                escape_pipes(group.1.unwrap_or(NOT_APPLICABLE))
            ));
            lines.push(TABLE_HEADER.to_string());
            lines.push(TABLE_RULE.to_string());
            current_group = Some(group);
        }
        lines.push(render_row(record));
    }

    lines.join("\n")
}

fn sort_key(record: &ComparisonRecord) -> (Option<&str>, Option<&str>, &str) {
    (
        record.display_name.as_deref(),
        record.unit.as_deref(),
        record.name.as_str(),
    )
}

fn summary_line(records: &[ComparisonRecord], skipped: usize) -> String {
    let regressions = records.iter().filter(|r| r.is_regression).count();
    let mut line = match regressions {
        0 => format!("{} benchmarks compared, no regressions.", records.len()),
        1 => format!("{} benchmarks compared, **1 regression**.", records.len()),
        n => format!("{} benchmarks compared, **{} regressions**.", records.len(), n),
    };
    if skipped > 0 {
        line.push_str(&format!(" {} without a baseline were skipped.", skipped));
    }
    line
}

fn render_row(record: &ComparisonRecord) -> String {
    format!(
        "| {} | {} | {:.3} | {:.3} | {} | {} |",
        if record.is_regression {
            STATUS_REGRESSION
        } else {
            STATUS_OK
        },
        clean_name(&record.name),
        record.candidate_mean,
        record.baseline_mean,
        format_delta(record.relative_delta),
        format_pvalue(record.pvalue)
    )
}

/// Short display form of a benchmark name
///
/// Keeps the last path segment, turns `(` into a space and drops `)`:
/// `bench/foo(x)` becomes `foo x`. Pipes are escaped so the name stays in
/// its table cell.
pub fn clean_name(name: &str) -> String {
    let last = name.rsplit(&['/', '\\'][..]).next().unwrap_or(name);
    escape_pipes(last.replace('(', " ").replace(')', "").trim())
}

fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Signed percentage with two decimals, or N/A for the infinite sentinel
pub fn format_delta(relative_delta: f64) -> String {
    if relative_delta.is_finite() {
        format!("{:+.2}%", relative_delta * 100.0)
    } else {
        NOT_APPLICABLE.to_string()
    }
}

/// p-value with three significant digits, or N/A when absent
pub fn format_pvalue(pvalue: Option<f64>) -> String {
    match pvalue {
        Some(p) => format_significant(p, 3),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// `%g`-style formatting: fixed notation for moderate magnitudes, scientific
/// otherwise, trailing zeros removed
fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        format!("{}e{}", trim_zeros(mantissa), exponent)
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
