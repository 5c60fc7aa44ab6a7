//! Benchmark – `jsonflow` single-shot and chunked decoding.
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsonflow::{decode_chunked, decode_strict, produce_chunks, Decoded, Value};

/// Produce a deterministic payload shaped like typical service traffic:
/// many small objects with short, repeating keys.
fn make_json_payload(objects: usize) -> String {
    let mut s = String::from("[");
    for i in 0..objects {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!(
            r#"{{"id":{i},"name":"item-{i}","ok":{},"tags":["a","b"],"score":{}.5}}"#,
            i % 2 == 0,
            i % 100,
        ));
    }
    s.push(']');
    s
}

fn run_single(payload: &[u8]) -> Value {
    decode_strict(payload).expect("benchmark payload is valid")
}

fn run_chunked(payload: &[u8], parts: usize) -> Value {
    let chunks = produce_chunks(payload, parts);
    match decode_chunked(chunks).expect("benchmark payload is valid") {
        Decoded::Complete(value) => value,
        Decoded::Suspended(resume) => resume.finish().expect("payload is complete"),
        Decoded::WithTrailing { .. } => unreachable!("payload has no trailing data"),
    }
}

fn bench_decode(c: &mut Criterion) {
    let payload = make_json_payload(1_000);
    let bytes = payload.as_bytes();

    let mut group = c.benchmark_group("decode_single_shot");
    group.bench_function("jsonflow", |b| {
        b.iter(|| black_box(run_single(black_box(bytes))));
    });
    group.bench_function("serde_json", |b| {
        b.iter(|| {
            let v: serde_json::Value =
                serde_json::from_slice(black_box(bytes)).expect("valid payload");
            black_box(v);
        });
    });
    group.finish();

    let mut group = c.benchmark_group("decode_chunked");
    for &parts in &[10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(parts), &parts, |b, &parts| {
            b.iter(|| black_box(run_chunked(black_box(bytes), parts)));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_decode }
criterion_main!(benches);
