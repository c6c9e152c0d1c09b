//! Unlock predicates: pure conditions over read-only world state.
//!
//! Every resource, producer and upgrade carries an [`UnlockPredicate`]. The
//! clock re-evaluates them once per tick against a [`WorldView`] and stores
//! the result as the entity's visibility.

use crate::id::{ProducerKind, ResourceKind, UpgradeKind};
use serde::{Deserialize, Serialize};

/// Read-only access to the state unlock predicates may inspect.
///
/// Unknown kinds read as zero / not purchased.
pub trait WorldView {
    fn resource_total(&self, kind: ResourceKind) -> u64;
    fn producer_count(&self, kind: ProducerKind) -> u64;
    fn upgrade_purchased(&self, kind: UpgradeKind) -> bool;
}

/// A condition that decides whether an entity is shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockPredicate {
    Always,
    Never,
    /// The resource's current total is at least `n`.
    ResourceAtLeast(ResourceKind, u64),
    /// At least `n` units of the producer are owned.
    ProducerAtLeast(ProducerKind, u64),
    UpgradePurchased(UpgradeKind),
    All(Vec<UnlockPredicate>),
    Any(Vec<UnlockPredicate>),
}

impl UnlockPredicate {
    pub fn evaluate(&self, world: &impl WorldView) -> bool {
        match self {
            UnlockPredicate::Always => true,
            UnlockPredicate::Never => false,
            UnlockPredicate::ResourceAtLeast(kind, n) => world.resource_total(*kind) >= *n,
            UnlockPredicate::ProducerAtLeast(kind, n) => world.producer_count(*kind) >= *n,
            UnlockPredicate::UpgradePurchased(kind) => world.upgrade_purchased(*kind),
            UnlockPredicate::All(all) => all.iter().all(|p| p.evaluate(world)),
            UnlockPredicate::Any(any) => any.iter().any(|p| p.evaluate(world)),
        }
    }

    /// Resources referenced anywhere in this predicate.
    pub fn resources(&self) -> Vec<ResourceKind> {
        let mut out = Vec::new();
        self.visit(&mut |p| {
            if let UnlockPredicate::ResourceAtLeast(kind, _) = p {
                out.push(*kind);
            }
        });
        out
    }

    /// Producers referenced anywhere in this predicate.
    pub fn producers(&self) -> Vec<ProducerKind> {
        let mut out = Vec::new();
        self.visit(&mut |p| {
            if let UnlockPredicate::ProducerAtLeast(kind, _) = p {
                out.push(*kind);
            }
        });
        out
    }

    /// Upgrades referenced anywhere in this predicate.
    pub fn upgrades(&self) -> Vec<UpgradeKind> {
        let mut out = Vec::new();
        self.visit(&mut |p| {
            if let UnlockPredicate::UpgradePurchased(kind) = p {
                out.push(*kind);
            }
        });
        out
    }

    fn visit(&self, f: &mut impl FnMut(&UnlockPredicate)) {
        f(self);
        if let UnlockPredicate::All(children) | UnlockPredicate::Any(children) = self {
            for child in children {
                child.visit(f);
            }
        }
    }
}

impl Default for UnlockPredicate {
    fn default() -> Self {
        UnlockPredicate::Always
    }
}
