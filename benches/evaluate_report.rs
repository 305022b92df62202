/// Evaluate + render cost for growing benchmark suites
use benchdiff::regression::{evaluate, RegressionConfig};
use benchdiff::report::Report;
use benchdiff::summary::{BenchmarkSummary, MeasurementSet};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const GROUPS: [(&str, &str); 3] = [("Latency", "ms"), ("Throughput", "ops/s"), ("Memory", "KiB")];

fn suite(size: usize, slowdown: f64) -> MeasurementSet {
    (0..size)
        .map(|i| {
            let (display, unit) = GROUPS[i % GROUPS.len()];
            let mean = 1.0 + (i % 17) as f64 * 0.1;
            BenchmarkSummary::new(format!("suite/bench_{}(case)", i), mean * slowdown, 0.05, 20)
                .with_group(display, unit)
        })
        .collect()
}

fn bench_evaluate_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_report");
    let config = RegressionConfig::default();

    for size in [10usize, 100, 1_000, 10_000] {
        let candidate = suite(size, 1.1);
        let baseline = suite(size, 1.0);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("evaluate", size), &size, |b, _| {
            b.iter(|| evaluate(black_box(&candidate), black_box(&baseline), &config))
        });

        let evaluation = evaluate(&candidate, &baseline, &config).unwrap();
        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| Report::render(black_box("Benchmarks"), black_box(&evaluation)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate_and_render);
criterion_main!(benches);
