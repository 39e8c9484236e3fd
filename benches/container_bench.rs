use std::hint::black_box;

use collectviz::containers::{
    ChainedMap, Container, DynamicArray, OrderedMap, PriorityHeap, RingDeque,
};
use collectviz::util::easing::EasingFunction;
use collectviz::value::Value;
use criterion::{criterion_group, criterion_main, Criterion};

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 };
    c.bench_function("cubic_hermite_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))));
    });
}

fn array_append_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_append");
    for count in [10, 100, 1000] {
        group.bench_function(format!("{count}_values"), |b| {
            b.iter(|| {
                let mut array = DynamicArray::new();
                for v in 0..count {
                    let _ = array.append(Value::from(v));
                }
                black_box(array.capacity())
            });
        });
    }
    group.finish();
}

fn hash_put_benchmark(c: &mut Criterion) {
    c.bench_function("chained_map_put_500", |b| {
        b.iter(|| {
            let mut map = ChainedMap::new();
            for k in 0..500 {
                let _ = map.put(Value::from(k), Value::from(k));
            }
            black_box(map.rehash_count())
        });
    });
}

fn tree_insert_benchmark(c: &mut Criterion) {
    c.bench_function("ordered_map_put_500", |b| {
        b.iter(|| {
            let mut map = OrderedMap::new();
            for k in 0..500 {
                let _ = map.put(Value::from((k * 7919) % 500), Value::from(k));
            }
            black_box(map.rotation_count())
        });
    });
}

fn heap_cycle_benchmark(c: &mut Criterion) {
    c.bench_function("heap_offer_poll_500", |b| {
        b.iter(|| {
            let mut heap = PriorityHeap::new();
            for k in (0..500).rev() {
                let _ = heap.offer(Value::from(k));
            }
            while let Ok(Some(v)) = heap.poll() {
                let _ = black_box(v);
            }
        });
    });
}

fn tick_benchmark(c: &mut Criterion) {
    let mut deque = RingDeque::new();
    for v in 0..256 {
        let _ = deque.add_last(Value::from(v));
    }
    c.bench_function("deque_tick_256", |b| {
        b.iter(|| black_box(deque.tick(black_box(1.0 / 60.0))));
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    array_append_benchmark,
    hash_put_benchmark,
    tree_insert_benchmark,
    heap_cycle_benchmark,
    tick_benchmark
);
criterion_main!(benches);
