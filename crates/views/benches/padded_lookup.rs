//! Benchmarks for indexed reads through padding and merging.
//!
//! Run with: `cargo bench -p stratus_views`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stratus_views::{Multiple, Padded, View};

#[path = "../tests/common.rs"]
mod common;
use common::{Series, ts};

/// Two six-hourly series of `days` days each, offset by half their length.
fn overlapping(days: usize) -> (Series, Series) {
    let start = ts("2000-01-01T00");
    let half = chrono::TimeDelta::days(i64::try_from(days / 2).unwrap_or(0));
    let span = chrono::TimeDelta::days(i64::try_from(days).unwrap_or(0));
    let dates = |from: stratus_types::Timestamp| {
        stratus_types::make_dates(from, from + span, common::hours(6))
    };
    (
        Series::from_dates(dates(start), common::hours(6), &["t2m", "sp"], 0.0),
        Series::from_dates(dates(start + half), common::hours(6), &["u10", "v10"], 0.0),
    )
}

fn bench_padded_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Padded_build");

    for days in [30_usize, 365, 3_650] {
        let (series, _) = overlapping(days);
        let end = series.dates[series.dates.len() - 1] + chrono::TimeDelta::days(30);
        let start = series.dates[0] - chrono::TimeDelta::days(30);

        group.throughput(Throughput::Elements(series.dates.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &series, |b, series| {
            b.iter(|| Padded::new(black_box(series.clone().boxed()), start, end));
        });
    }

    group.finish();
}

fn bench_multiple_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("Multiple_get");

    for days in [30_usize, 365, 3_650] {
        let (a, b) = overlapping(days);
        let Ok(multiple) = Multiple::new(vec![a.boxed(), b.boxed()]) else {
            continue;
        };

        group.throughput(Throughput::Elements(multiple.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &multiple, |b, multiple| {
            b.iter(|| {
                for i in 0..multiple.len() {
                    let _ = black_box(multiple.get(black_box(i)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_padded_build, bench_multiple_get);
criterion_main!(benches);
