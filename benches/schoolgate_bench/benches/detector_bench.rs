//! Detector and sanitizer benchmarks
//!
//! Measures the per-keystroke cost of the text pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schoolgate_validate::{detect_suspicious, escape_html, matching_patterns, sanitize};

const INPUTS: &[(&str, &str)] = &[
    ("username", "joao.silva"),
    ("email", "maria.santos@escola.com.br"),
    ("search", "notas de matemática do 3º bimestre"),
    ("tautology", "' OR '1'='1"),
    ("union", "1 UNION ALL SELECT senha FROM usuarios"),
    ("xss", "<img src=x onerror=alert(1)>"),
];

/// Benchmark the detector set on short inputs
fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_suspicious");

    for (name, input) in INPUTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| detect_suspicious(black_box(input)))
        });
    }

    group.finish();

    c.bench_function("matching_patterns/union", |b| {
        b.iter(|| matching_patterns(black_box("1 UNION ALL SELECT senha FROM usuarios")))
    });
}

/// Benchmark sanitize and escape across input sizes
fn bench_text_cleanup(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_cleanup");

    for size in [16usize, 256, 2048] {
        let input = "Olá,\tmundo <b>escola</b>  ".repeat(size / 16 + 1);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("sanitize", size), &input, |b, input| {
            b.iter(|| sanitize(black_box(input)))
        });
        group.bench_with_input(BenchmarkId::new("escape_html", size), &input, |b, input| {
            b.iter(|| escape_html(black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detection, bench_text_cleanup);
criterion_main!(benches);
