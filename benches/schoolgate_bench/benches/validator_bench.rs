//! Field and batch validator benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use schoolgate_validate::audit::{InMemorySink, SecurityLogger};
use schoolgate_validate::{
    validate_all_with, validate_json_with, validate_login_identifier, validate_numeric,
    validate_search_term, FieldKind, NumericOptions, RawInput, Validators,
};
use serde_json::json;

/// Benchmark the individual field validators
fn bench_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_validators");

    let login = RawInput::from("  joao.silva  ");
    group.bench_function("login", |b| {
        b.iter(|| validate_login_identifier(black_box(&login)))
    });

    let search = RawInput::from("Ação: média (2º bimestre)!");
    group.bench_function("search", |b| {
        b.iter(|| validate_search_term(black_box(&search)))
    });

    let grade = RawInput::from("8.5");
    let bounds = NumericOptions::range(0.0, 10.0);
    group.bench_function("numeric", |b| {
        b.iter(|| validate_numeric(black_box(&grade), &bounds))
    });

    group.finish();
}

/// Benchmark record validation, including security logging
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    let validators = Validators::new()
        .kind("username", FieldKind::Login)
        .kind("password", FieldKind::password())
        .kind("grade", FieldKind::Numeric(NumericOptions::range(0.0, 10.0)));
    let logger = SecurityLogger::new(InMemorySink::bounded(1_000));

    group.bench_function("clean_record", |b| {
        b.iter(|| {
            validate_all_with(
                black_box([("username", "joao.silva"), ("password", "123456"), ("grade", "7")]),
                &validators,
                &logger,
            )
        })
    });

    group.bench_function("injected_record", |b| {
        b.iter(|| {
            validate_all_with(
                black_box([("username", "admin'--"), ("password", "' or 1=1"), ("grade", "7")]),
                &validators,
                &logger,
            )
        })
    });

    let record = json!({ "username": "maria.santos", "password": "segredo", "grade": 9 });
    group.bench_function("json_record", |b| {
        b.iter(|| validate_json_with(black_box(&record), &validators, &logger))
    });

    group.finish();
}

criterion_group!(benches, bench_fields, bench_batch);
criterion_main!(benches);
