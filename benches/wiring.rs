use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use wirebox::{attrs, reference, Container, Contract, Definition, ServiceObject, Value};

// ===== Micro Benchmarks =====

fn bench_reference_find(c: &mut Criterion) {
    let value = Value::from(json!({
        "a": "#config.db.dsn",
        "b": "#defaults#overrides",
        "c": { "nested": "#logger", "plain": "no references here" },
        "d": "##escaped literal"
    }));

    c.bench_function("reference_find_mixed", |b| {
        b.iter(|| {
            let found = reference::find(black_box(&value));
            black_box(found);
        })
    });
}

fn bench_reference_resolve(c: &mut Criterion) {
    let mut map = reference::ReferenceMap::new();
    map.insert("defaults".to_string(), Value::from(json!({ "host": "localhost", "port": 80 })));
    map.insert("overrides".to_string(), Value::from(json!({ "port": 8080 })));
    map.insert("logger".to_string(), Value::from(json!({ "level": "info" })));

    let value = Value::from(json!({
        "config": "#defaults#overrides",
        "log": "#logger"
    }));

    c.bench_function("reference_resolve_merge", |b| {
        b.iter(|| {
            let resolved = reference::resolve(black_box(&value), &map).unwrap();
            black_box(resolved);
        })
    });
}

fn chain(n: usize) -> Vec<Definition> {
    (0..n)
        .map(|i| {
            let mut definition = Definition::new(format!("svc{}", i), json!({ "index": i }));
            if i > 0 {
                definition = definition.with_dependency("prev", format!("#svc{}", i - 1));
            }
            definition
        })
        .collect()
}

fn bench_sort_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_chain");
    for n in [10usize, 50, 100] {
        let definitions = chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &definitions, |b, defs| {
            b.iter(|| {
                let sorted = wirebox::sorter::sort(black_box(defs)).unwrap();
                black_box(sorted.len());
            })
        });
    }
    group.finish();
}

fn bench_container_build(c: &mut Criterion) {
    c.bench_function("container_build_small_graph", |b| {
        b.iter_batched(
            || {
                let mailer = ServiceObject::new("Mailer").with_method("send").with_need(
                    Contract::new()
                        .with("transport", attrs(json!({ "value": { "type": "string" } })))
                        .with("logger", attrs(json!({ "optional": true }))),
                );
                let mut container = Container::standard();
                container.add_definitions(vec![
                    Definition::new("config", json!({ "mail": { "transport": "smtp" } })),
                    Definition::new("logger", json!({ "level": "info" })),
                    Definition::new("mailer", mailer)
                        .with_dependency("transport", "#config.mail.transport")
                        .with_dependency("logger", "#logger"),
                ]);
                container
            },
            |mut container| {
                container.build().unwrap();
                black_box(container.service_keys().len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_reference_find,
    bench_reference_resolve,
    bench_sort_chain,
    bench_container_build
);
criterion_main!(benches);
