use anyhow::Result;
use benchdiff::cli::{Cli, OutputFormat};
use benchdiff::json_output::JsonReport;
use benchdiff::publish::{publish, GitHubCommentStore, PublishError};
use benchdiff::regression::evaluate;
use benchdiff::report::Report;
use benchdiff::summary::MeasurementSet;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_ERROR: u8 = 1;
const EXIT_REGRESSION: u8 = 2;
const EXIT_PUBLISH_FAILED: u8 = 3;

/// Initialize tracing subscriber; warnings by default, everything with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Evaluate, print, then publish; returns whether regressions were found
fn run(args: &Cli) -> Result<bool> {
    let (title, config) = args.load_settings()?;
    let target = args.github_target()?;

    let candidate = MeasurementSet::from_file(&args.candidate)?;
    let baseline = MeasurementSet::from_file(&args.baseline)?;
    tracing::debug!(
        "Loaded {} candidate and {} baseline benchmarks",
        candidate.len(),
        baseline.len()
    );

    let evaluation = evaluate(&candidate, &baseline, &config)?;
    let report = Report::render(&title, &evaluation);

    // Printed before publishing so a publication failure never loses it
    match args.format {
        OutputFormat::Markdown => println!("{}", report.body),
        OutputFormat::Json => println!("{}", JsonReport::new(&title, &evaluation).to_json()?),
    }

    if let Some((target, token)) = target {
        let mut store = GitHubCommentStore::new(target, token)?;
        publish(&mut store, &report)?;
    }

    Ok(evaluation.has_regressions())
}

fn main() -> ExitCode {
    let args = Cli::parse();

    init_tracing(args.debug);

    match run(&args) {
        Ok(true) if args.fail_on_regression => ExitCode::from(EXIT_REGRESSION),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<PublishError>().is_some() => {
            eprintln!("Error: failed to publish report: {:#}", e);
            ExitCode::from(EXIT_PUBLISH_FAILED)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
