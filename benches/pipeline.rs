//! Benchmarks for the migration pipeline stages.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use meander::filter::{moving_average, wavelet_filter, Morlet};
use meander::{MigrationConfig, MigrationPipeline, PlanformSeries};
use std::f64::consts::PI;

fn survey(n: usize, dy: f64) -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|v| 8.0 * (2.0 * PI * (v + 10.0) / 60.0).sin() + dy)
        .collect();
    (x, y)
}

fn bench_curvature_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("curvature_filter");

    for n in [256, 1024, 4096] {
        let signal: Vec<f64> = (0..n).map(|i| (i as f64 / 20.0).sin()).collect();
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("moving_average", n), &signal, |b, s| {
            b.iter(|| moving_average(black_box(s)))
        });

        if n <= 1024 {
            group.bench_with_input(BenchmarkId::new("morlet", n), &signal, |b, s| {
                b.iter(|| wavelet_filter(&Morlet::default(), black_box(s), 1.0, 0.33))
            });
        }
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = MigrationConfig::default();

    for surveys in [2, 5, 10] {
        let series = PlanformSeries::new(
            (0..surveys).map(|t| survey(2000, -0.1 * t as f64)),
            &config,
        )
        .unwrap();
        let pipeline = MigrationPipeline::new(config.clone()).unwrap();

        group.bench_with_input(BenchmarkId::new("run", surveys), &series, |b, series| {
            b.iter(|| pipeline.run(black_box(series)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_curvature_filters, bench_pipeline);
criterion_main!(benches);
