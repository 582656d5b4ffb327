use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use shared_state::{AppState, Format, KeyValueStore, MemoryStore, Writable};

fn writable_read_benchmark(c: &mut Criterion) {
    let cell = Writable::new(String::from(r#"{ "cool_app": true }"#));

    c.bench_function("writable_read", |b| {
        b.iter(|| {
            black_box(cell.with(|text| text.len()));
        });
    });
}

fn writable_set_benchmark(c: &mut Criterion) {
    let cell = Writable::new(0_usize);

    c.bench_function("writable_set", |b| {
        let mut i = 0;
        b.iter(|| {
            cell.set(black_box(i));
            i += 1;
        });
    });
}

fn writable_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("writable_notify");

    for subscriber_count in [1, 10, 100].iter() {
        let cell = Writable::new(0_usize);

        let guards: Vec<_> = (0..*subscriber_count)
            .map(|_| {
                cell.subscribe(|_| {
                    // Empty subscriber
                })
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    cell.update(|value| *value = black_box(i));
                    i += 1;
                });
            },
        );
        drop(guards);
    }
    group.finish();
}

fn state_sync_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = runtime.block_on(AppState::open(store)).unwrap();

    c.bench_function("state_sync", |b| {
        b.iter(|| {
            state.input_format().set(black_box(Format::Yaml.to_string()));
            runtime.block_on(state.sync()).unwrap();
        });
    });
}

criterion_group!(
    benches,
    writable_read_benchmark,
    writable_set_benchmark,
    writable_subscribe_benchmark,
    state_sync_benchmark,
);
criterion_main!(benches);
