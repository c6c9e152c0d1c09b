//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::{Catalog, CatalogBuilder, ProducerDef, ResourceDef, UpgradeDef};
use crate::cost::Cost;
use crate::fixed::Fixed64;
use crate::id::*;
use crate::sim::SimConfig;
use crate::unlock::UnlockPredicate;
use crate::upgrade::RateTarget;
use crate::world::World;
use std::collections::BTreeMap;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Catalogs
// ===========================================================================

/// The built-in catalog. Panics if it ever stops validating.
pub fn standard_catalog() -> Catalog {
    Catalog::standard().expect("standard catalog must validate")
}

/// Food, Ants and First Queen only.
pub fn tiny_builder() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();
    b.register_resource(ResourceDef {
        kind: ResourceKind::Food,
        starts_visible: true,
        unlock: UnlockPredicate::Always,
    });
    b.register_producer(ProducerDef {
        kind: ProducerKind::Ants,
        cost: Cost::from_entries([(ResourceKind::Food, 10)]),
        outputs: BTreeMap::from([(ResourceKind::Food, fixed(0.5))]),
        starting_count: 0,
        starts_visible: true,
        unlock: UnlockPredicate::Always,
    });
    b.register_upgrade(UpgradeDef {
        kind: UpgradeKind::FirstQueen,
        cost: Cost::from_entries([(ResourceKind::Food, 500)]),
        rate_modifiers: BTreeMap::from([(RateTarget::Producer(ProducerKind::Ants), fixed(2.0))]),
        unlock: UnlockPredicate::ProducerAtLeast(ProducerKind::Ants, 25),
        boost: None,
        replace: None,
        display_text: "Ants x2".to_string(),
    });
    b
}

pub fn tiny_catalog() -> Catalog {
    tiny_builder().build().expect("tiny catalog must validate")
}

// ===========================================================================
// Worlds
// ===========================================================================

pub fn standard_world() -> World {
    World::new(&standard_catalog(), SimConfig::default())
}

pub fn accelerated_world(multiplier: f64) -> World {
    World::new(&standard_catalog(), SimConfig::accelerated(multiplier).expect("multiplier must be representable"))
}

/// Overwrite a resource total, bypassing the economy.
pub fn set_resource(world: &mut World, kind: ResourceKind, total: u64) {
    world
        .ledger
        .get_mut(kind)
        .expect("resource in catalog")
        .total = total;
}

/// Overwrite a producer's owned count without touching its cost ladder.
pub fn set_producer_count(world: &mut World, kind: ProducerKind, count: u64) {
    world
        .producers
        .get_mut(kind)
        .expect("producer in catalog")
        .owned_count = count;
}

/// Mark an upgrade purchased without paying for it or applying effects.
pub fn force_purchased(world: &mut World, kind: UpgradeKind) {
    world
        .upgrades
        .get_mut(kind)
        .expect("upgrade in catalog")
        .purchased = true;
}
