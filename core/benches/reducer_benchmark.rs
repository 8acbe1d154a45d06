/// Stream reducer benchmarks using Criterion
///
/// Run with: cargo bench --bench reducer_benchmark
///
/// Benchmarks cover:
/// - Dedup log ingestion with and without duplicate suppression
/// - Detection field ingestion plus decay sweeps
/// - Window series appends
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vigil_core::event::{AccessEvent, AccessStatus};
use vigil_core::reducers::{DedupLog, EnvironmentWindows, SweepConfig, SweepField};

fn make_access(i: u64) -> AccessEvent {
    AccessEvent {
        status: AccessStatus::Authorized,
        name: "bench".to_string(),
        uid: format!("uid_{}", i),
        method: "NFC".to_string(),
        time: format!("12:00:{:02}", i % 60),
    }
}

/// Benchmark: dedup log ingestion of unique events
fn bench_dedup_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup_log_ingest");

    for event_count in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*event_count));
        group.bench_with_input(
            BenchmarkId::from_parameter(event_count),
            event_count,
            |b, &count| {
                b.iter(|| {
                    let mut log = DedupLog::new(5);
                    for i in 0..count {
                        log.ingest(black_box(make_access(i)));
                    }
                    black_box(log.len())
                });
            },
        );
    }
    group.finish();
}

/// Benchmark: dedup log facing a stream of consecutive duplicates
fn bench_dedup_log_duplicates(c: &mut Criterion) {
    c.bench_function("dedup_log_suppression", |b| {
        let event = make_access(1);
        b.iter(|| {
            let mut log = DedupLog::new(5);
            for _ in 0..1_000 {
                log.ingest(black_box(event.clone()));
            }
            black_box(log.len())
        });
    });
}

/// Benchmark: detection ingestion interleaved with decay sweeps
fn bench_sweep_field(c: &mut Criterion) {
    c.bench_function("sweep_observe_and_decay", |b| {
        b.iter(|| {
            let mut field = SweepField::new(SweepConfig::default());
            let mut now = 0u64;
            for i in 0..1_000u64 {
                now += 1_100;
                field.observe(black_box(15.0 + (i % 150) as f64), 100.0, now);
                if i % 10 == 0 {
                    field.sweep(now);
                }
            }
            black_box(field.len())
        });
    });
}

/// Benchmark: aligned environment window appends
fn bench_window_series(c: &mut Criterion) {
    c.bench_function("environment_window_record", |b| {
        b.iter(|| {
            let mut env = EnvironmentWindows::new(12);
            for i in 0..1_000 {
                env.record(black_box("12:00"), i as f64, i as f64, i as f64);
            }
            black_box(env.temperature.len())
        });
    });
}

criterion_group!(
    benches,
    bench_dedup_log,
    bench_dedup_log_duplicates,
    bench_sweep_field,
    bench_window_series
);
criterion_main!(benches);
