use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use loglane::{MapConf, Registry};

fn json_batch(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            format!(
                r#"{{"ts":"2023-01-01T12:00:{:02}Z","level":"INFO","user":"u{}","latency_ms":{}}}"#,
                i % 60,
                i % 97,
                i * 7 % 1000
            )
        })
        .collect()
}

fn slow_log_batch(events: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(events * 4);
    for i in 0..events {
        lines.push(format!("# User@Host: app[app] @ web-{} [10.0.0.{}]", i % 8, i % 250));
        lines.push(format!(
            "# Query_time: 0.{:06}  Lock_time: 0.000010 Rows_sent: {}  Rows_examined: {}",
            i * 13 % 1_000_000,
            i % 50,
            i * 3
        ));
        lines.push(format!("SET timestamp={};", 1_672_574_400 + i));
        lines.push(format!("SELECT * FROM orders WHERE id = {};", i));
    }
    lines
}

fn parser_conf(kind: &str, workers: usize) -> MapConf {
    let mut conf = MapConf::new();
    conf.set("type", kind);
    conf.set("workers", workers.to_string());
    conf
}

fn bench_json_workers(c: &mut Criterion) {
    let batch = json_batch(1000);
    let mut group = c.benchmark_group("json_batch");
    group.throughput(Throughput::Elements(batch.len() as u64));

    for workers in [1, 2, 4, 8] {
        let mut parser = Registry::default()
            .new_parser(&parser_conf("json", workers))
            .expect("json parser");
        group.bench_with_input(BenchmarkId::from_parameter(workers), &batch, |b, batch| {
            b.iter(|| black_box(parser.parse(black_box(batch))));
        });
    }
    group.finish();
}

fn bench_slow_log_single_worker(c: &mut Criterion) {
    let batch = slow_log_batch(250);
    let mut parser = Registry::default()
        .new_parser(&parser_conf("mysqllog", 1))
        .expect("mysqllog parser");

    let mut group = c.benchmark_group("mysqllog_batch");
    group.throughput(Throughput::Elements(batch.len() as u64));
    group.bench_function("single_worker", |b| {
        b.iter(|| {
            let outcome = parser.parse(black_box(&batch));
            black_box((outcome, parser.flush()))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_json_workers, bench_slow_log_single_worker);
criterion_main!(benches);
