//! Upgrades: one-time purchases that multiply production rates, trigger a
//! boost, or replace one producer line with another.

use crate::cost::Cost;
use crate::fixed::Fixed64;
use crate::id::{ProducerKind, ResourceKind, UpgradeKind};
use crate::unlock::UnlockPredicate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What a rate modifier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RateTarget {
    /// Every output rate of a producer.
    Producer(ProducerKind),
    /// The manual gather action.
    Click,
}

impl fmt::Display for RateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateTarget::Producer(kind) => fmt::Display::fmt(kind, f),
            RateTarget::Click => f.write_str("Gathering"),
        }
    }
}

/// Sacrifice `donor` to temporarily boost `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostSpec {
    pub donor: ProducerKind,
    pub target: ProducerKind,
    /// Initial `remaining_ticks` of the boost.
    pub duration_ticks: i64,
    /// Resource retired together with the donor, if any.
    pub retire: Option<ResourceKind>,
}

/// Retire `old` and seed `new` with `round(old.owned_count / divisor)` units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceSpec {
    pub old: ProducerKind,
    pub new: ProducerKind,
    pub divisor: u64,
    /// Resource retired together with the old producer, if any.
    pub retire: Option<ResourceKind>,
}

/// Runtime state of one upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub kind: UpgradeKind,
    /// Monotonic: once true, never reset.
    pub purchased: bool,
    pub cost: Cost,
    /// Multipliers applied in place on purchase. All are >= 1.
    pub rate_modifiers: BTreeMap<RateTarget, Fixed64>,
    pub unlock: UnlockPredicate,
    pub boost: Option<BoostSpec>,
    pub replace: Option<ReplaceSpec>,
    pub display_text: String,
    pub visible: bool,
}

impl Upgrade {
    /// 1 once purchased, otherwise 0.
    pub fn owned_count(&self) -> u64 {
        u64::from(self.purchased)
    }
}

/// Every upgrade in the world, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRegistry {
    upgrades: BTreeMap<UpgradeKind, Upgrade>,
}

impl UpgradeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, upgrade: Upgrade) {
        self.upgrades.insert(upgrade.kind, upgrade);
    }

    pub fn get(&self, kind: UpgradeKind) -> Option<&Upgrade> {
        self.upgrades.get(&kind)
    }

    pub fn get_mut(&mut self, kind: UpgradeKind) -> Option<&mut Upgrade> {
        self.upgrades.get_mut(&kind)
    }

    pub fn contains(&self, kind: UpgradeKind) -> bool {
        self.upgrades.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Upgrade> {
        self.upgrades.values_mut()
    }

    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }

    pub fn purchased_count(&self) -> usize {
        self.upgrades.values().filter(|u| u.purchased).count()
    }

    /// True when every registered upgrade has been bought. An empty
    /// registry is never complete.
    pub fn all_purchased(&self) -> bool {
        !self.upgrades.is_empty() && self.upgrades.values().all(|u| u.purchased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgrade(kind: UpgradeKind, purchased: bool) -> Upgrade {
        Upgrade {
            kind,
            purchased,
            cost: Cost::new(),
            rate_modifiers: BTreeMap::new(),
            unlock: UnlockPredicate::Always,
            boost: None,
            replace: None,
            display_text: String::new(),
            visible: false,
        }
    }

    #[test]
    fn owned_count_reflects_purchase() {
        assert_eq!(upgrade(UpgradeKind::Club, false).owned_count(), 0);
        assert_eq!(upgrade(UpgradeKind::Club, true).owned_count(), 1);
    }

    #[test]
    fn completion_requires_every_upgrade() {
        let mut reg = UpgradeRegistry::new();
        assert!(!reg.all_purchased());
        reg.insert(upgrade(UpgradeKind::FirstQueen, true));
        reg.insert(upgrade(UpgradeKind::Stilts, false));
        assert!(!reg.all_purchased());
        assert_eq!(reg.purchased_count(), 1);
        reg.get_mut(UpgradeKind::Stilts).unwrap().purchased = true;
        assert!(reg.all_purchased());
    }

    #[test]
    fn rate_target_display() {
        assert_eq!(RateTarget::Producer(ProducerKind::Ants).to_string(), "Ants");
        assert_eq!(RateTarget::Click.to_string(), "Gathering");
    }
}
