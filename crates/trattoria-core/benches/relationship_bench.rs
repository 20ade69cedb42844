//! # Relationship Benchmarks
//!
//! Performance benchmarks for the relationship engine.
//!
//! Run with: `cargo bench -p trattoria-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trattoria_core::{
    Association, Hierarchy, IngredientId, MenuItemId, Multiplicity, Ownership, RelationshipDef,
    Restaurant, Side, StaffId, restaurant_from_bytes, restaurant_to_bytes,
};

const MANY_TO_MANY: RelationshipDef = RelationshipDef::new(
    "bench-many",
    Side::guarded("targets", Multiplicity::ZERO_OR_MORE),
    Side::guarded("sources", Multiplicity::ZERO_OR_MORE),
    Ownership::Aggregation,
);

const TREE: RelationshipDef = RelationshipDef::new(
    "bench-tree",
    Side::guarded("subordinates", Multiplicity::ZERO_OR_MORE),
    Side::guarded("supervisor", Multiplicity::ZERO_OR_ONE),
    Ownership::Reflexive,
);

/// Every source linked to the next `fan` targets.
fn create_mesh(size: u64, fan: u64) -> Association<MenuItemId, IngredientId> {
    let mut a = Association::new(MANY_TO_MANY);
    for s in 0..size {
        for t in s..s + fan {
            a.attach(MenuItemId(s), IngredientId(t)).expect("attach");
        }
    }
    a
}

/// A single supervision chain `0 <- 1 <- ... <- size-1`.
fn create_chain(size: u64) -> Hierarchy<StaffId> {
    let mut h = Hierarchy::new(TREE);
    for member in 1..size {
        h.set_supervisor(StaffId(member), StaffId(member - 1))
            .expect("link");
    }
    h
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_attach(c: &mut Criterion) {
    let mut group = c.benchmark_group("attach");

    for size in [100u64, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_mesh(size, 4)));
        });
    }

    group.finish();
}

fn bench_detach(c: &mut Criterion) {
    let mut group = c.benchmark_group("detach");

    for size in [100u64, 1000].iter() {
        let mesh = create_mesh(*size, 4);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut a = mesh.clone();
                for s in 0..size {
                    let _ = a.detach(MenuItemId(s), IngredientId(s));
                }
                black_box(a)
            });
        });
    }

    group.finish();
}

fn bench_hierarchy(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy");

    for size in [100u64, 500, 1000].iter() {
        let chain = create_chain(*size);
        let leaf = StaffId(size - 1);

        group.bench_with_input(BenchmarkId::new("chain", size), &leaf, |b, &leaf| {
            b.iter(|| black_box(chain.chain(leaf)));
        });

        // Worst case: the cycle check walks the whole chain.
        group.bench_with_input(BenchmarkId::new("cycle_check", size), &leaf, |b, &leaf| {
            b.iter(|| black_box(chain.check_set_supervisor(StaffId(0), leaf)));
        });
    }

    group.finish();
}

fn bench_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");
    let bytes = restaurant_to_bytes(&Restaurant::new()).expect("serialize");

    group.bench_function("empty_roundtrip", |b| {
        b.iter(|| black_box(restaurant_from_bytes(&bytes)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_attach,
    bench_detach,
    bench_hierarchy,
    bench_persistence
);
criterion_main!(benches);
