//! Criterion benchmarks for rust_log_dispatcher

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_log_dispatcher::prelude::*;
use std::sync::Arc;
use std::thread;

/// Sink that accepts and discards every record
struct NullSink;

impl Sink for NullSink {
    fn id(&self) -> &str {
        "null"
    }

    fn write(&self, data: &[u8]) -> Result<usize> {
        Ok(black_box(data).len())
    }
}

fn null_logger(threshold: LogLevel) -> Logger {
    Logger::builder()
        .threshold(threshold)
        .prefix("bench")
        .sink(Arc::new(NullSink))
        .subscribe("null", &[LogLevel::Error, LogLevel::Warning, LogLevel::Info])
        .build()
        .expect("null sink is registered")
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(LogLevel::Debug);

    group.bench_function("plain", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("formatted", |b| {
        b.iter(|| {
            rust_log_dispatcher::error!(logger, "request {} failed: {}", black_box(42), "timeout")
        });
    });

    group.bench_function("values", |b| {
        b.iter(|| logger.log_values(LogLevel::Warning, &[&"retry", &black_box(3), &"of", &5]));
    });

    group.bench_function("unsubscribed", |b| {
        b.iter(|| logger.debug(black_box("admitted, no subscribers")));
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(LogLevel::Error);

    group.bench_function("suppressed", |b| {
        b.iter(|| logger.info(black_box("below threshold")));
    });

    group.bench_function("is_enabled", |b| {
        b.iter(|| black_box(logger.is_enabled(black_box(LogLevel::Info))));
    });

    group.finish();
}

fn bench_concurrent_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_dispatch");

    for threads in [2usize, 4, 8] {
        let per_thread = 1000;
        group.throughput(Throughput::Elements((threads * per_thread) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let logger = Arc::new(null_logger(LogLevel::Debug));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..per_thread {
                                logger.log_values(LogLevel::Info, &[&"message", &i]);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Telegram Sink Benchmarks
// ============================================================================

#[cfg(feature = "telegram")]
fn bench_telegram_append(c: &mut Criterion) {
    use rust_log_dispatcher::sinks::{ChatMessage, ChatTransport};
    use std::time::Duration;

    struct DiscardTransport;

    impl ChatTransport for DiscardTransport {
        fn send(&self, message: &ChatMessage<'_>) -> Result<()> {
            black_box(message);
            Ok(())
        }
    }

    let mut group = c.benchmark_group("telegram_sink");
    group.throughput(Throughput::Elements(1));

    let sink = TelegramSink::with_transport(
        DiscardTransport,
        vec!["1".to_string()],
        Duration::from_millis(50),
    )
    .expect("transport sink builds");
    let record = b"ERR: 2017-05-31 22:29:11.7489315 +03:00 host-bench bench.rs:1: boom\n";

    group.bench_function("write", |b| {
        b.iter(|| sink.write(black_box(record)));
    });

    group.bench_function("write_and_send", |b| {
        b.iter(|| {
            sink.write(black_box(record)).unwrap();
            sink.send().unwrap()
        });
    });

    group.finish();
}

#[cfg(not(feature = "telegram"))]
fn bench_telegram_append(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_dispatch,
    bench_level_filtering,
    bench_concurrent_dispatch,
    bench_telegram_append,
);
criterion_main!(benches);
