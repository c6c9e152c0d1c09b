//! Criterion benchmarks for the Antics simulation core.
//!
//! Three benchmark groups:
//! - `tick`: one tick of a late-game colony with every producer owned
//! - `purchase`: buy-max on a producer with a deep stockpile
//! - `snapshot`: building the full presentation snapshot

use antics_core::id::*;
use antics_core::test_utils::*;
use antics_core::world::World;
use criterion::{Criterion, criterion_group, criterion_main};

// ===========================================================================
// World builders
// ===========================================================================

/// A colony with every line staffed and every resource stocked.
fn build_late_game() -> World {
    let mut world = standard_world();
    for (i, kind) in ProducerKind::ALL.iter().copied().enumerate() {
        set_producer_count(&mut world, kind, 50 + 10 * i as u64);
    }
    for &kind in ResourceKind::ALL {
        set_resource(&mut world, kind, 1_000_000);
    }
    world
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    let mut world = build_late_game();
    group.bench_function("late_game_colony", |b| {
        b.iter(|| {
            world.tick();
            world.drain_events();
        });
    });

    group.finish();
}

fn bench_purchase(c: &mut Criterion) {
    let mut group = c.benchmark_group("purchase");
    group.sample_size(50);

    group.bench_function("buy_max_ants_1m_food", |b| {
        b.iter_batched(
            build_late_game,
            |mut world| {
                world.purchase_producer(ProducerKind::Ants, 0).unwrap();
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    let world = build_late_game();
    group.bench_function("full_snapshot", |b| {
        b.iter(|| world.snapshot());
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_purchase, bench_snapshot);
criterion_main!(benches);
