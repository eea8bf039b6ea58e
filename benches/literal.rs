use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mathlock::Ciphertext;

fn sample() -> Ciphertext {
    Ciphertext::new(
        "-1927364.5520193874",
        "88172635462.00012",
        "0.000018273645",
        "-7716253.991827364",
    )
}

fn literal_benchmark(c: &mut Criterion) {
    let ciphertext = sample();
    let literal = ciphertext.to_literal();

    let mut group = c.benchmark_group("literal");
    group.bench_function("format", |b| b.iter(|| black_box(&ciphertext).to_literal()));
    group.bench_function("parse", |b| {
        b.iter(|| Ciphertext::from_literal(black_box(&literal)).unwrap())
    });
    group.bench_function("json_decode", |b| {
        let json = serde_json::to_string(&ciphertext).unwrap();
        b.iter(|| serde_json::from_str::<Ciphertext>(black_box(&json)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, literal_benchmark);
criterion_main!(benches);
