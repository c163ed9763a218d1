use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pinmap::{Pin, Scope, Store};

/// Synthetic pin population: namespaces with methods, constants and
/// mixin references, roughly shaped like a mid-size codebase.
fn corpus(namespaces: usize) -> Vec<Arc<Pin>> {
    let mut pins = Vec::new();
    for n in 0..namespaces {
        let ns = format!("Mod{}", n);
        pins.push(Arc::new(Pin::namespace(ns.clone(), "")));
        pins.push(Arc::new(Pin::include_ref("Comparable", ns.clone())));
        for m in 0..8 {
            pins.push(Arc::new(Pin::method(
                format!("method_{}", m),
                ns.clone(),
                Scope::Instance,
            )));
        }
        pins.push(Arc::new(Pin::constant("VERSION", ns)));
    }
    pins
}

fn bench_full_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_build");
    for size in [100, 500] {
        let pins = corpus(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &pins, |b, pins| {
            b.iter(|| Store::new(pins.iter().cloned(), None));
        });
    }
    group.finish();
}

fn bench_incremental_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_build");
    for size in [100, 500] {
        let pins = corpus(size);
        let base = Store::new(pins.iter().cloned(), None);

        // One namespace's worth of churn, well under the reuse threshold.
        let mut next = pins.clone();
        next.pop();
        next.push(Arc::new(Pin::method("fresh", "Mod0", Scope::Instance)));

        group.bench_with_input(BenchmarkId::from_parameter(size), &next, |b, next| {
            b.iter(|| Store::new(next.iter().cloned(), Some(&base)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_build, bench_incremental_build);
criterion_main!(benches);
