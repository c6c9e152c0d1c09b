//! The built-in ant colony catalog.
//!
//! Progression: Ants gather Food, the First Queen unlocks Workers for Sticks
//! and Stones, the Wheel replaces Workers with Haulers, the Club opens up
//! Soldiers and Land, and the late game runs through Mining, Forest and the
//! Industrial Revolution. Metal Weapons sacrifices the Soldiers (and Land)
//! into a temporary boost for the Miners.

use crate::catalog::{Catalog, CatalogBuilder, CatalogError, ProducerDef, ResourceDef, UpgradeDef};
use crate::cost::Cost;
use crate::fixed::f64_to_fixed64;
use crate::id::{ProducerKind, ResourceKind, UpgradeKind};
use crate::unlock::UnlockPredicate;
use crate::upgrade::{BoostSpec, RateTarget, ReplaceSpec};
use std::collections::BTreeMap;

use ProducerKind as P;
use ResourceKind as R;
use UpgradeKind as U;

/// Ticks a sacrificial boost lasts.
pub const BOOST_DURATION: i64 = 30;
/// Divisor applied to the old producer's count when a line is replaced.
pub const REPLACE_DIVISOR: u64 = 2;

impl Catalog {
    /// The built-in colony catalog.
    pub fn standard() -> Result<Catalog, CatalogError> {
        standard_builder().build()
    }
}

/// Builder preloaded with the built-in catalog, for callers that want to
/// tweak it before validation.
pub fn standard_builder() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();
    b.gather_into(R::Food);

    for (kind, unlock) in [
        (R::Food, UnlockPredicate::Always),
        (R::Sticks, bought(U::FirstQueen)),
        (R::Stones, bought(U::FirstQueen)),
        (R::Land, bought(U::Club)),
        (R::Metal, bought(U::Mining)),
        (R::Lumber, bought(U::Forest)),
        (R::Energy, bought(U::IndustrialRevolution)),
    ] {
        b.register_resource(ResourceDef {
            kind,
            starts_visible: kind == R::Food,
            unlock,
        });
    }

    producer(&mut b, P::Ants, &[(R::Food, 10)], &[(R::Food, 0.5)], UnlockPredicate::Always);
    producer(
        &mut b,
        P::Workers,
        &[(R::Food, 100)],
        &[(R::Sticks, 0.2), (R::Stones, 0.1)],
        bought(U::FirstQueen),
    );
    producer(
        &mut b,
        P::Haulers,
        &[(R::Food, 500), (R::Sticks, 50)],
        &[(R::Food, 1.0), (R::Sticks, 1.0), (R::Stones, 0.5)],
        bought(U::Wheel),
    );
    producer(
        &mut b,
        P::Soldiers,
        &[(R::Food, 750), (R::Stones, 75)],
        &[(R::Land, 0.1)],
        bought(U::Club),
    );
    producer(
        &mut b,
        P::Miners,
        &[(R::Food, 2500), (R::Sticks, 250), (R::Stones, 100)],
        &[(R::Stones, 1.0), (R::Metal, 0.2)],
        bought(U::Mining),
    );
    producer(
        &mut b,
        P::Lumberjacks,
        &[(R::Food, 4000), (R::Sticks, 400)],
        &[(R::Lumber, 0.5), (R::Sticks, 1.0)],
        bought(U::Forest),
    );
    producer(
        &mut b,
        P::Engineers,
        &[(R::Food, 10000), (R::Metal, 100)],
        &[(R::Energy, 0.25)],
        bought(U::IndustrialRevolution),
    );

    upgrade(
        &mut b,
        U::FirstQueen,
        &[(R::Food, 500)],
        &[(RateTarget::Producer(P::Ants), 2.0)],
        owns(P::Ants, 25),
        "Ants x2",
    );
    upgrade(
        &mut b,
        U::SugarWater,
        &[(R::Food, 1500)],
        &[(RateTarget::Producer(P::Ants), 1.5), (RateTarget::Click, 2.0)],
        UnlockPredicate::All(vec![bought(U::FirstQueen), owns(P::Ants, 40)]),
        "Ants x1.5, Gathering x2",
    );
    upgrade(
        &mut b,
        U::Stilts,
        &[(R::Food, 1000), (R::Sticks, 50)],
        &[(RateTarget::Producer(P::Workers), 1.5)],
        owns(P::Workers, 10),
        "Workers x1.5",
    );
    upgrade(
        &mut b,
        U::PackFrame,
        &[(R::Food, 2500), (R::Sticks, 150)],
        &[(RateTarget::Producer(P::Workers), 2.0)],
        bought(U::Stilts),
        "Workers x2",
    );
    b.register_upgrade(UpgradeDef {
        replace: Some(ReplaceSpec {
            old: P::Workers,
            new: P::Haulers,
            divisor: REPLACE_DIVISOR,
            retire: None,
        }),
        ..upgrade_def(
            U::Wheel,
            &[(R::Food, 5000), (R::Sticks, 300), (R::Stones, 100)],
            &[],
            UnlockPredicate::All(vec![bought(U::PackFrame), owns(P::Workers, 20)]),
            "Workers become Haulers",
        )
    });
    upgrade(
        &mut b,
        U::Club,
        &[(R::Food, 2500), (R::Sticks, 100), (R::Stones, 50)],
        &[(RateTarget::Click, 2.0)],
        has(R::Stones, 25),
        "Gathering x2, unlocks Soldiers",
    );
    upgrade(
        &mut b,
        U::Farming,
        &[(R::Food, 8000), (R::Land, 20)],
        &[(RateTarget::Producer(P::Ants), 3.0)],
        has(R::Land, 10),
        "Ants x3",
    );
    upgrade(
        &mut b,
        U::Forest,
        &[(R::Food, 10000), (R::Land, 50)],
        &[],
        has(R::Land, 25),
        "Unlocks Lumberjacks",
    );
    upgrade(
        &mut b,
        U::Quarry,
        &[(R::Sticks, 500), (R::Land, 40)],
        &[(RateTarget::Producer(P::Haulers), 2.0)],
        UnlockPredicate::All(vec![bought(U::Wheel), has(R::Land, 20)]),
        "Haulers x2",
    );
    upgrade(
        &mut b,
        U::Outpost,
        &[(R::Food, 25000), (R::Land, 100)],
        &[(RateTarget::Producer(P::Soldiers), 2.0)],
        owns(P::Soldiers, 20),
        "Soldiers x2",
    );
    upgrade(
        &mut b,
        U::Mining,
        &[(R::Food, 20000), (R::Stones, 1000), (R::Land, 60)],
        &[],
        bought(U::Quarry),
        "Unlocks Miners",
    );
    upgrade(
        &mut b,
        U::MetalTools,
        &[(R::Metal, 100), (R::Lumber, 50)],
        &[
            (RateTarget::Producer(P::Miners), 2.0),
            (RateTarget::Producer(P::Haulers), 1.5),
        ],
        has(R::Metal, 50),
        "Miners x2, Haulers x1.5",
    );
    b.register_upgrade(UpgradeDef {
        boost: Some(BoostSpec {
            donor: P::Soldiers,
            target: P::Miners,
            duration_ticks: BOOST_DURATION,
            retire: Some(R::Land),
        }),
        ..upgrade_def(
            U::MetalWeapons,
            &[(R::Food, 50000), (R::Metal, 250)],
            &[],
            UnlockPredicate::All(vec![
                bought(U::Outpost),
                bought(U::Farming),
                bought(U::Forest),
                has(R::Metal, 100),
            ]),
            "Soldiers arm the Miners",
        )
    });
    upgrade(
        &mut b,
        U::IndustrialRevolution,
        &[(R::Stones, 5000), (R::Metal, 500), (R::Lumber, 200)],
        &[(RateTarget::Producer(P::Miners), 2.0)],
        UnlockPredicate::All(vec![bought(U::MetalTools), has(R::Lumber, 100)]),
        "Miners x2, unlocks Engineers",
    );
    upgrade(
        &mut b,
        U::IndustrialFarming,
        &[(R::Food, 100000), (R::Energy, 50)],
        &[(RateTarget::Producer(P::Ants), 5.0), (RateTarget::Click, 5.0)],
        has(R::Energy, 25),
        "Ants x5, Gathering x5",
    );
    upgrade(
        &mut b,
        U::TreeFarming,
        &[(R::Lumber, 500), (R::Energy, 100)],
        &[(RateTarget::Producer(P::Lumberjacks), 3.0)],
        UnlockPredicate::All(vec![has(R::Energy, 50), owns(P::Lumberjacks, 10)]),
        "Lumberjacks x3",
    );

    b
}

fn bought(kind: UpgradeKind) -> UnlockPredicate {
    UnlockPredicate::UpgradePurchased(kind)
}

fn owns(kind: ProducerKind, n: u64) -> UnlockPredicate {
    UnlockPredicate::ProducerAtLeast(kind, n)
}

fn has(kind: ResourceKind, n: u64) -> UnlockPredicate {
    UnlockPredicate::ResourceAtLeast(kind, n)
}

fn producer(
    b: &mut CatalogBuilder,
    kind: ProducerKind,
    cost: &[(ResourceKind, u64)],
    outputs: &[(ResourceKind, f64)],
    unlock: UnlockPredicate,
) {
    b.register_producer(ProducerDef {
        kind,
        cost: Cost::from_entries(cost.iter().copied()),
        outputs: outputs
            .iter()
            .map(|&(r, rate)| (r, f64_to_fixed64(rate)))
            .collect(),
        starting_count: 0,
        starts_visible: kind == P::Ants,
        unlock,
    });
}

fn upgrade(
    b: &mut CatalogBuilder,
    kind: UpgradeKind,
    cost: &[(ResourceKind, u64)],
    modifiers: &[(RateTarget, f64)],
    unlock: UnlockPredicate,
    display_text: &str,
) {
    b.register_upgrade(upgrade_def(kind, cost, modifiers, unlock, display_text));
}

/// A plain upgrade with no boost or replace effect.
fn upgrade_def(
    kind: UpgradeKind,
    cost: &[(ResourceKind, u64)],
    modifiers: &[(RateTarget, f64)],
    unlock: UnlockPredicate,
    display_text: &str,
) -> UpgradeDef {
    let rate_modifiers: BTreeMap<RateTarget, _> = modifiers
        .iter()
        .map(|&(t, m)| (t, f64_to_fixed64(m)))
        .collect();
    UpgradeDef {
        kind,
        cost: Cost::from_entries(cost.iter().copied()),
        rate_modifiers,
        unlock,
        boost: None,
        replace: None,
        display_text: display_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_validates() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.resources().len(), ResourceKind::ALL.len());
        assert_eq!(catalog.producers().len(), ProducerKind::ALL.len());
        assert_eq!(catalog.upgrades().len(), UpgradeKind::ALL.len());
        assert_eq!(catalog.gather_resource(), ResourceKind::Food);
    }

    #[test]
    fn only_food_and_ants_start_visible() {
        let catalog = Catalog::standard().unwrap();
        let visible: Vec<_> = catalog
            .resources()
            .iter()
            .filter(|r| r.starts_visible)
            .map(|r| r.kind)
            .collect();
        assert_eq!(visible, vec![ResourceKind::Food]);
        let visible: Vec<_> = catalog
            .producers()
            .iter()
            .filter(|p| p.starts_visible)
            .map(|p| p.kind)
            .collect();
        assert_eq!(visible, vec![ProducerKind::Ants]);
    }

    #[test]
    fn first_queen_unlocks_at_25_ants() {
        let catalog = Catalog::standard().unwrap();
        let fq = catalog.upgrade(UpgradeKind::FirstQueen).unwrap();
        assert_eq!(fq.unlock, owns(ProducerKind::Ants, 25));
        assert_eq!(fq.cost.get(ResourceKind::Food), 500);
    }

    #[test]
    fn metal_weapons_is_gated_behind_land_spenders() {
        let catalog = Catalog::standard().unwrap();
        let mw = catalog.upgrade(UpgradeKind::MetalWeapons).unwrap();
        let boost = mw.boost.as_ref().unwrap();
        assert_eq!(boost.donor, ProducerKind::Soldiers);
        assert_eq!(boost.target, ProducerKind::Miners);
        assert_eq!(boost.duration_ticks, BOOST_DURATION);
        assert_eq!(boost.retire, Some(ResourceKind::Land));
        let gated = mw.unlock.upgrades();
        for kind in [UpgradeKind::Outpost, UpgradeKind::Farming, UpgradeKind::Forest] {
            assert!(gated.contains(&kind), "{kind} not required");
        }
    }

    #[test]
    fn wheel_replaces_workers_with_haulers() {
        let catalog = Catalog::standard().unwrap();
        let wheel = catalog.upgrade(UpgradeKind::Wheel).unwrap();
        let replace = wheel.replace.as_ref().unwrap();
        assert_eq!(replace.old, ProducerKind::Workers);
        assert_eq!(replace.new, ProducerKind::Haulers);
        assert_eq!(replace.divisor, REPLACE_DIVISOR);
    }
}
