use arbor_json::{language, parse_with};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample(items: usize) -> String {
    let entries: Vec<String> = (0..items)
        .map(|i| {
            format!(
                r#"{{"id": {}, "name": "item \"{}\"", "tags": ["a", "b", null], "active": {}}}"#,
                i,
                i,
                i % 2 == 0
            )
        })
        .collect();
    format!(r#"{{"items": [{}]}}"#, entries.join(", "))
}

fn parse_documents(c: &mut Criterion) {
    let language = language().unwrap();
    let small = sample(10);
    let large = sample(1000);

    c.bench_function("parse_small", |b| {
        b.iter(|| parse_with(&language, black_box(&small)))
    });

    c.bench_function("parse_large", |b| {
        b.iter(|| parse_with(&language, black_box(&large)))
    });
}

fn render_documents(c: &mut Criterion) {
    let language = language().unwrap();
    let document = parse_with(&language, &sample(1000)).unwrap();

    c.bench_function("render_large", |b| b.iter(|| black_box(&document).render_text()));
}

fn compile_language(c: &mut Criterion) {
    c.bench_function("compile_json_language", |b| b.iter(language));
}

criterion_group!(benches, parse_documents, render_documents, compile_language);
criterion_main!(benches);
