// Repeated evaluations for the same title converge on a single comment

use benchdiff::publish::{publish, CommentStore, InMemoryCommentStore, PublishOutcome};
use benchdiff::regression::{evaluate, RegressionConfig};
use benchdiff::report::Report;
use benchdiff::summary::{BenchmarkSummary, MeasurementSet};

fn report(title: &str, candidate_mean: f64) -> Report {
    let candidate = MeasurementSet::new(vec![
        BenchmarkSummary::new("bench/foo(x)", candidate_mean, 0.05, 10).with_group("Latency", "ms")
    ]);
    let baseline = MeasurementSet::new(vec![
        BenchmarkSummary::new("bench/foo(x)", 1.00, 0.05, 10).with_group("Latency", "ms")
    ]);
    let evaluation = evaluate(&candidate, &baseline, &RegressionConfig::default()).unwrap();
    Report::render(title, &evaluation)
}

#[test]
fn test_publish_twice_keeps_one_comment() {
    let mut store = InMemoryCommentStore::new();

    let first = report("PR #12 benchmarks", 1.20);
    let second = report("PR #12 benchmarks", 1.05);
    assert_eq!(first.id_marker, second.id_marker);

    let created = publish(&mut store, &first).unwrap();
    let updated = publish(&mut store, &second).unwrap();

    assert!(matches!(created, PublishOutcome::Created { .. }));
    assert_eq!(
        updated,
        PublishOutcome::Updated {
            id: created.comment_id()
        }
    );

    let comments = store.comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, second.body);
    assert!(comments[0].body.contains("+5.00%"));
    assert!(!comments[0].body.contains("+20.00%"));
}

#[test]
fn test_same_input_republished_is_stable() {
    let mut store = InMemoryCommentStore::new();
    let report = report("Nightly", 1.20);

    publish(&mut store, &report).unwrap();
    publish(&mut store, &report).unwrap();
    publish(&mut store, &report).unwrap();

    assert_eq!(store.comments().len(), 1);
    assert_eq!(store.comments()[0].body, report.body);
}

#[test]
fn test_other_reports_left_untouched() {
    let mut store = InMemoryCommentStore::new();
    store.create_comment("Looks good to me").unwrap();

    publish(&mut store, &report("Latency", 1.20)).unwrap();
    publish(&mut store, &report("Memory", 1.20)).unwrap();
    publish(&mut store, &report("Latency", 1.00)).unwrap();

    let comments = store.comments();
    assert_eq!(comments.len(), 3);
    assert_eq!(comments[0].body, "Looks good to me");
    assert!(comments[1].body.contains("## Latency"));
    assert!(comments[1].body.contains("no regressions"));
    assert!(comments[2].body.contains("## Memory"));
}

#[test]
fn test_end_to_end_rows() {
    let regressed = report("E2E", 1.20);
    assert!(regressed
        .body
        .contains("| ❌ regression | foo x | 1.200 | 1.000 | +20.00% |"));

    let below_threshold = report("E2E", 1.05);
    assert!(below_threshold
        .body
        .contains("| ✅ ok | foo x | 1.050 | 1.000 | +5.00% |"));
}
