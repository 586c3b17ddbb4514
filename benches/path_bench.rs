//! Benchmarks for jsondb path operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsondb::path::{get, parse_path, set};
use serde_json::{json, Value};

fn sample_document() -> Value {
    let mut doc = json!({});
    for i in 0..1000 {
        let item = json!({ "id": i, "name": format!("item-{}", i), "tags": ["a", "b"] });
        doc = set(doc, &parse_path(&format!("items[{}]", i)).unwrap(), Some(item)).unwrap();
    }
    doc
}

fn path_benchmarks(c: &mut Criterion) {
    c.bench_function("parse_path", |b| {
        b.iter(|| parse_path(black_box(r#"monsters["cookie-monster"].scares[12].name"#)))
    });

    let doc = sample_document();
    let deep = parse_path("items[999].tags[1]").unwrap();
    c.bench_function("get_deep", |b| b.iter(|| get(black_box(&doc), black_box(&deep))));

    let target = parse_path("items[500].name").unwrap();
    c.bench_function("set_clone_document", |b| {
        b.iter(|| set(doc.clone(), black_box(&target), Some(json!("renamed"))))
    });
}

criterion_group!(benches, path_benchmarks);
criterion_main!(benches);
