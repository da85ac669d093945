//! Criterion benchmarks for stroke ingestion and loop detection.
//! Focus: full-buffer scans (max_length in {150, 600}) and one lasso end to end.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use lasso::api::{
    find_crossing, lasso_stroke, Effects, Entity, EventQueue, LassoCfg, LassoReplay, LassoShape,
    Stroke, World,
};
use nalgebra::Vector2;

/// A spiral never crosses itself: every scan walks the whole window.
fn spiral(n: usize) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|k| {
            let th = k as f64 * 0.3;
            let r = 1.0 + 0.05 * k as f64;
            Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect()
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for &n in &[150usize, 600] {
        let pts = spiral(n);
        let valid = vec![true; n];
        group.bench_with_input(BenchmarkId::new("find_crossing_miss", n), &n, |b, _| {
            b.iter(|| find_crossing(&pts, &valid))
        });
    }
    group.finish();
}

fn bench_lasso(c: &mut Criterion) {
    let mut group = c.benchmark_group("stroke");
    let shape = LassoShape::default();
    let samples = lasso_stroke(&shape, LassoReplay::new(3, 0));
    let cfg = LassoCfg::default();
    group.bench_function("lasso_end_to_end", |b| {
        b.iter_batched(
            || {
                let mut world = World::new();
                for k in 0..20 {
                    world.register(Entity::health(Vector2::new(k as f64 * 0.1 - 1.0, 0.0), 100, 1));
                }
                (Stroke::new(&cfg), world, Effects::new(), EventQueue::new())
            },
            |(mut stroke, mut world, mut fx, mut q)| {
                for (p, t) in &samples {
                    stroke.append(*p, *t);
                    let _ev = stroke.tick(*t, &mut world, &mut fx, &mut q);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_scan, bench_lasso);
criterion_main!(benches);
