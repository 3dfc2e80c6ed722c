// Criterion benchmarks for swipe bookkeeping

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dealmatch::core::{GestureResolver, MatchRegistry};
use dealmatch::models::{CandidateKind, SwipeCandidate};

fn create_candidate(id: usize) -> SwipeCandidate {
    SwipeCandidate::builder(format!("deal{}", id), format!("Deal {}", id))
        .company("Acme Holdings")
        .status("Active")
        .time("2h ago")
        .badge(if id % 3 == 0 { "Premium" } else { "Verified" })
        .kind(CandidateKind::Deal)
        .value(100_000.0 * (id % 50 + 1) as f64)
        .build()
        .unwrap()
}

fn filled_registry(size: usize) -> MatchRegistry {
    let mut registry = MatchRegistry::new();
    for id in 0..size {
        if id % 2 == 0 {
            registry.accept(create_candidate(id));
        } else {
            registry.decline(create_candidate(id));
        }
    }
    registry
}

fn bench_swipe_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("swipe_toggle");

    for size in [10, 100, 500].iter() {
        let candidate = create_candidate(0);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut registry = filled_registry(size);
            b.iter(|| {
                registry.decline(black_box(candidate.clone()));
                registry.accept(black_box(candidate.clone()));
            });
        });
    }

    group.finish();
}

fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership");

    for size in [10, 100, 500].iter() {
        let registry = filled_registry(*size);
        let last = format!("deal{}", size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &last, |b, id| {
            b.iter(|| registry.membership(black_box(id)));
        });
    }

    group.finish();
}

fn bench_resolve_drag(c: &mut Criterion) {
    let resolver = GestureResolver::default();

    c.bench_function("resolve_drag", |b| {
        b.iter(|| {
            for dx in [-250.0, -100.0, 0.0, 99.5, 180.0] {
                black_box(resolver.resolve_drag(black_box(dx)));
            }
        });
    });
}

criterion_group!(benches, bench_swipe_toggle, bench_membership, bench_resolve_drag);
criterion_main!(benches);
