//! Benchmarks for wrapping, hashing and path writes.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rime::{Container, path};
use serde_json::{Value as JsonValue, json};
use std::time::Duration;

fn todo_json(n: usize) -> JsonValue {
    let todos: Vec<_> = (0..n)
        .map(|i| json!({"title": format!("Item {}", i), "completed": false, "tags": ["a", "b"]}))
        .collect();
    json!({"todos": todos})
}

fn todo_list(n: usize) -> Container {
    Container::wrap(todo_json(n)).unwrap()
}

/// Deep wrap of plain data
fn bench_wrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap");

    for n in [10, 100, 1000] {
        let plain = todo_json(n);
        group.bench_with_input(BenchmarkId::new("json", n), &plain, |b, plain| {
            b.iter(|| Container::wrap(plain).unwrap());
        });

        let wrapped = todo_list(n);
        group.bench_with_input(BenchmarkId::new("thaw", n), &wrapped, |b, wrapped| {
            b.iter(|| wrapped.thaw());
        });
    }

    group.finish();
}

/// Hashing: first computation against the cached read
fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");

    for n in [10, 100, 1000] {
        let plain = todo_json(n);
        group.bench_with_input(BenchmarkId::new("fresh", n), &plain, |b, plain| {
            b.iter(|| Container::wrap(plain).unwrap().hash_code());
        });

        let cached = todo_list(n);
        cached.hash_code();
        group.bench_with_input(BenchmarkId::new("cached", n), &cached, |b, cached| {
            b.iter(|| cached.hash_code());
        });
    }

    group.finish();
}

/// One write in the middle of the list
fn bench_set_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_in");

    for n in [10, 100, 1000] {
        let root = todo_list(n);
        let target = path!["todos", n / 2, "completed"];
        group.bench_with_input(BenchmarkId::new("middle", n), &root, |b, root| {
            b.iter(|| root.set_in(&target, true).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("rewrap", n), &root, |b, root| {
            b.iter(|| {
                let mut plain = root.thaw();
                plain["todos"][n / 2]["completed"] = json!(true);
                Container::wrap(plain).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(3));
    targets = bench_wrap, bench_hash, bench_set_in
}
criterion_main!(benches);
