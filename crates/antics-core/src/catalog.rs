//! The immutable content catalog: every resource, producer and upgrade the
//! world starts with.
//!
//! Built once through [`CatalogBuilder`], validated, then handed to
//! [`World::new`](crate::world::World::new). Nothing in the catalog changes
//! after construction; all runtime state lives in the world.

use crate::cost::Cost;
use crate::fixed::Fixed64;
use crate::id::{ProducerKind, ResourceKind, UpgradeKind};
use crate::unlock::UnlockPredicate;
use crate::upgrade::{BoostSpec, RateTarget, ReplaceSpec};
use std::collections::{BTreeMap, HashSet};

/// A resource definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDef {
    pub kind: ResourceKind,
    pub starts_visible: bool,
    pub unlock: UnlockPredicate,
}

/// A producer definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerDef {
    pub kind: ProducerKind,
    /// Cost of the first unit.
    pub cost: Cost,
    /// Output per unit per tick.
    pub outputs: BTreeMap<ResourceKind, Fixed64>,
    pub starting_count: u64,
    pub starts_visible: bool,
    pub unlock: UnlockPredicate,
}

/// An upgrade definition.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDef {
    pub kind: UpgradeKind,
    pub cost: Cost,
    pub rate_modifiers: BTreeMap<RateTarget, Fixed64>,
    pub unlock: UnlockPredicate,
    pub boost: Option<BoostSpec>,
    pub replace: Option<ReplaceSpec>,
    pub display_text: String,
}

/// Errors found while validating a catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("resource {0} registered twice")]
    DuplicateResource(ResourceKind),
    #[error("producer {0} registered twice")]
    DuplicateProducer(ProducerKind),
    #[error("upgrade {0} registered twice")]
    DuplicateUpgrade(UpgradeKind),
    #[error("unknown resource {kind} referenced by {context}")]
    UnknownResource { kind: ResourceKind, context: String },
    #[error("unknown producer {kind} referenced by {context}")]
    UnknownProducer { kind: ProducerKind, context: String },
    #[error("unknown upgrade {kind} referenced by {context}")]
    UnknownUpgrade { kind: UpgradeKind, context: String },
    #[error("upgrade {upgrade} has multiplier {multiplier} for {target}, must be >= 1")]
    MultiplierBelowOne {
        upgrade: UpgradeKind,
        target: RateTarget,
        multiplier: Fixed64,
    },
    #[error("upgrade {0} replaces with a divisor of zero")]
    ZeroDivisor(UpgradeKind),
    #[error("upgrade {0} has a negative boost duration")]
    NegativeDuration(UpgradeKind),
    #[error("producer {0} has no outputs")]
    NoOutputs(ProducerKind),
    #[error("producer {0} costs nothing")]
    FreeProducer(ProducerKind),
    #[error("producer {producer} has negative rate for {resource}")]
    InvalidRate {
        producer: ProducerKind,
        resource: ResourceKind,
    },
}

/// Validated, immutable content catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    resources: Vec<ResourceDef>,
    producers: Vec<ProducerDef>,
    upgrades: Vec<UpgradeDef>,
    gather_resource: ResourceKind,
}

impl Catalog {
    pub fn resources(&self) -> &[ResourceDef] {
        &self.resources
    }

    pub fn producers(&self) -> &[ProducerDef] {
        &self.producers
    }

    pub fn upgrades(&self) -> &[UpgradeDef] {
        &self.upgrades
    }

    /// The resource the manual gather action adds to.
    pub fn gather_resource(&self) -> ResourceKind {
        self.gather_resource
    }

    pub fn resource(&self, kind: ResourceKind) -> Option<&ResourceDef> {
        self.resources.iter().find(|d| d.kind == kind)
    }

    pub fn producer(&self, kind: ProducerKind) -> Option<&ProducerDef> {
        self.producers.iter().find(|d| d.kind == kind)
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|d| d.kind == kind)
    }
}

/// Builder for constructing a validated [`Catalog`].
/// Two-phase lifecycle: registration (and mutation) -> validation.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    resources: Vec<ResourceDef>,
    producers: Vec<ProducerDef>,
    upgrades: Vec<UpgradeDef>,
    gather_resource: ResourceKind,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            producers: Vec::new(),
            upgrades: Vec::new(),
            gather_resource: ResourceKind::Food,
        }
    }

    pub fn register_resource(&mut self, def: ResourceDef) -> &mut Self {
        self.resources.push(def);
        self
    }

    pub fn register_producer(&mut self, def: ProducerDef) -> &mut Self {
        self.producers.push(def);
        self
    }

    pub fn register_upgrade(&mut self, def: UpgradeDef) -> &mut Self {
        self.upgrades.push(def);
        self
    }

    pub fn gather_into(&mut self, resource: ResourceKind) -> &mut Self {
        self.gather_resource = resource;
        self
    }

    /// Mutate an already registered producer.
    pub fn mutate_producer<F>(&mut self, kind: ProducerKind, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut ProducerDef),
    {
        let def = self
            .producers
            .iter_mut()
            .find(|d| d.kind == kind)
            .ok_or_else(|| CatalogError::UnknownProducer {
                kind,
                context: "mutate_producer".to_string(),
            })?;
        f(def);
        Ok(())
    }

    /// Mutate an already registered upgrade.
    pub fn mutate_upgrade<F>(&mut self, kind: UpgradeKind, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut UpgradeDef),
    {
        let def = self
            .upgrades
            .iter_mut()
            .find(|d| d.kind == kind)
            .ok_or_else(|| CatalogError::UnknownUpgrade {
                kind,
                context: "mutate_upgrade".to_string(),
            })?;
        f(def);
        Ok(())
    }

    /// Validate every cross-reference and freeze the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut resources = HashSet::new();
        for def in &self.resources {
            if !resources.insert(def.kind) {
                return Err(CatalogError::DuplicateResource(def.kind));
            }
        }
        let mut producers = HashSet::new();
        for def in &self.producers {
            if !producers.insert(def.kind) {
                return Err(CatalogError::DuplicateProducer(def.kind));
            }
        }
        let mut upgrades = HashSet::new();
        for def in &self.upgrades {
            if !upgrades.insert(def.kind) {
                return Err(CatalogError::DuplicateUpgrade(def.kind));
            }
        }

        let refs = Refs {
            resources: &resources,
            producers: &producers,
            upgrades: &upgrades,
        };

        refs.resource(self.gather_resource, || "gather action".to_string())?;

        for def in &self.resources {
            refs.predicate(&def.unlock, || format!("unlock of resource {}", def.kind))?;
        }

        for def in &self.producers {
            if def.outputs.is_empty() {
                return Err(CatalogError::NoOutputs(def.kind));
            }
            for (&resource, &rate) in &def.outputs {
                refs.resource(resource, || format!("outputs of producer {}", def.kind))?;
                if rate < Fixed64::ZERO {
                    return Err(CatalogError::InvalidRate {
                        producer: def.kind,
                        resource,
                    });
                }
            }
            if def.cost.iter().all(|(_, amount)| amount == 0) {
                return Err(CatalogError::FreeProducer(def.kind));
            }
            for resource in def.cost.resources() {
                refs.resource(resource, || format!("cost of producer {}", def.kind))?;
            }
            refs.predicate(&def.unlock, || format!("unlock of producer {}", def.kind))?;
        }

        for def in &self.upgrades {
            let ctx = |what: &str| format!("{what} of upgrade {}", def.kind);
            for resource in def.cost.resources() {
                refs.resource(resource, || ctx("cost"))?;
            }
            for (&target, &multiplier) in &def.rate_modifiers {
                if let RateTarget::Producer(kind) = target {
                    refs.producer(kind, || ctx("rate modifiers"))?;
                }
                if multiplier < Fixed64::ONE {
                    return Err(CatalogError::MultiplierBelowOne {
                        upgrade: def.kind,
                        target,
                        multiplier,
                    });
                }
            }
            refs.predicate(&def.unlock, || ctx("unlock"))?;
            if let Some(boost) = &def.boost {
                refs.producer(boost.donor, || ctx("boost donor"))?;
                refs.producer(boost.target, || ctx("boost target"))?;
                if let Some(resource) = boost.retire {
                    refs.resource(resource, || ctx("boost retirement"))?;
                }
                if boost.duration_ticks < 0 {
                    return Err(CatalogError::NegativeDuration(def.kind));
                }
            }
            if let Some(replace) = &def.replace {
                refs.producer(replace.old, || ctx("replaced producer"))?;
                refs.producer(replace.new, || ctx("replacement producer"))?;
                if let Some(resource) = replace.retire {
                    refs.resource(resource, || ctx("replace retirement"))?;
                }
                if replace.divisor == 0 {
                    return Err(CatalogError::ZeroDivisor(def.kind));
                }
            }
        }

        Ok(Catalog {
            resources: self.resources,
            producers: self.producers,
            upgrades: self.upgrades,
            gather_resource: self.gather_resource,
        })
    }
}

/// Registered kinds, used to resolve references during validation.
struct Refs<'a> {
    resources: &'a HashSet<ResourceKind>,
    producers: &'a HashSet<ProducerKind>,
    upgrades: &'a HashSet<UpgradeKind>,
}

impl Refs<'_> {
    fn resource(&self, kind: ResourceKind, ctx: impl FnOnce() -> String) -> Result<(), CatalogError> {
        if self.resources.contains(&kind) {
            Ok(())
        } else {
            Err(CatalogError::UnknownResource { kind, context: ctx() })
        }
    }

    fn producer(&self, kind: ProducerKind, ctx: impl FnOnce() -> String) -> Result<(), CatalogError> {
        if self.producers.contains(&kind) {
            Ok(())
        } else {
            Err(CatalogError::UnknownProducer { kind, context: ctx() })
        }
    }

    fn upgrade(&self, kind: UpgradeKind, ctx: impl FnOnce() -> String) -> Result<(), CatalogError> {
        if self.upgrades.contains(&kind) {
            Ok(())
        } else {
            Err(CatalogError::UnknownUpgrade { kind, context: ctx() })
        }
    }

    fn predicate(
        &self,
        predicate: &UnlockPredicate,
        ctx: impl Fn() -> String,
    ) -> Result<(), CatalogError> {
        for kind in predicate.resources() {
            self.resource(kind, &ctx)?;
        }
        for kind in predicate.producers() {
            self.producer(kind, &ctx)?;
        }
        for kind in predicate.upgrades() {
            self.upgrade(kind, &ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;

    fn food() -> ResourceDef {
        ResourceDef {
            kind: ResourceKind::Food,
            starts_visible: true,
            unlock: UnlockPredicate::Always,
        }
    }

    fn ants() -> ProducerDef {
        ProducerDef {
            kind: ProducerKind::Ants,
            cost: Cost::from_entries([(ResourceKind::Food, 10)]),
            outputs: BTreeMap::from([(ResourceKind::Food, f64_to_fixed64(0.5))]),
            starting_count: 0,
            starts_visible: true,
            unlock: UnlockPredicate::Always,
        }
    }

    fn first_queen() -> UpgradeDef {
        UpgradeDef {
            kind: UpgradeKind::FirstQueen,
            cost: Cost::from_entries([(ResourceKind::Food, 500)]),
            rate_modifiers: BTreeMap::from([(
                RateTarget::Producer(ProducerKind::Ants),
                f64_to_fixed64(2.0),
            )]),
            unlock: UnlockPredicate::ProducerAtLeast(ProducerKind::Ants, 25),
            boost: None,
            replace: None,
            display_text: "Ants x2".to_string(),
        }
    }

    fn setup_builder() -> CatalogBuilder {
        let mut b = CatalogBuilder::new();
        b.register_resource(food())
            .register_producer(ants())
            .register_upgrade(first_queen());
        b
    }

    #[test]
    fn register_and_build() {
        let catalog = setup_builder().build().unwrap();
        assert_eq!(catalog.resources().len(), 1);
        assert_eq!(catalog.producers().len(), 1);
        assert_eq!(catalog.upgrades().len(), 1);
        assert_eq!(catalog.gather_resource(), ResourceKind::Food);
        assert!(catalog.producer(ProducerKind::Ants).is_some());
        assert!(catalog.producer(ProducerKind::Miners).is_none());
    }

    #[test]
    fn duplicate_producer_fails() {
        let mut b = setup_builder();
        b.register_producer(ants());
        assert_eq!(
            b.build().unwrap_err(),
            CatalogError::DuplicateProducer(ProducerKind::Ants)
        );
    }

    #[test]
    fn unknown_cost_resource_fails() {
        let mut b = setup_builder();
        b.mutate_producer(ProducerKind::Ants, |p| p.cost.add(ResourceKind::Metal, 1))
            .unwrap();
        assert!(matches!(
            b.build(),
            Err(CatalogError::UnknownResource {
                kind: ResourceKind::Metal,
                ..
            })
        ));
    }

    #[test]
    fn unknown_predicate_reference_fails() {
        let mut b = setup_builder();
        b.mutate_upgrade(UpgradeKind::FirstQueen, |u| {
            u.unlock = UnlockPredicate::UpgradePurchased(UpgradeKind::Wheel);
        })
        .unwrap();
        assert!(matches!(
            b.build(),
            Err(CatalogError::UnknownUpgrade {
                kind: UpgradeKind::Wheel,
                ..
            })
        ));
    }

    #[test]
    fn multiplier_below_one_fails() {
        let mut b = setup_builder();
        b.mutate_upgrade(UpgradeKind::FirstQueen, |u| {
            u.rate_modifiers.insert(RateTarget::Click, f64_to_fixed64(0.5));
        })
        .unwrap();
        assert!(matches!(
            b.build(),
            Err(CatalogError::MultiplierBelowOne { .. })
        ));
    }

    #[test]
    fn zero_divisor_fails() {
        let mut b = setup_builder();
        b.mutate_upgrade(UpgradeKind::FirstQueen, |u| {
            u.replace = Some(ReplaceSpec {
                old: ProducerKind::Ants,
                new: ProducerKind::Ants,
                divisor: 0,
                retire: None,
            });
        })
        .unwrap();
        assert_eq!(
            b.build().unwrap_err(),
            CatalogError::ZeroDivisor(UpgradeKind::FirstQueen)
        );
    }

    #[test]
    fn producer_without_outputs_fails() {
        let mut b = setup_builder();
        b.mutate_producer(ProducerKind::Ants, |p| p.outputs.clear())
            .unwrap();
        assert_eq!(
            b.build().unwrap_err(),
            CatalogError::NoOutputs(ProducerKind::Ants)
        );
    }

    #[test]
    fn free_producer_fails() {
        let mut b = setup_builder();
        b.mutate_producer(ProducerKind::Ants, |p| p.cost = Cost::new())
            .unwrap();
        assert_eq!(
            b.build().unwrap_err(),
            CatalogError::FreeProducer(ProducerKind::Ants)
        );
    }

    #[test]
    fn gather_resource_must_exist() {
        let mut b = setup_builder();
        b.gather_into(ResourceKind::Sticks);
        assert!(matches!(
            b.build(),
            Err(CatalogError::UnknownResource {
                kind: ResourceKind::Sticks,
                ..
            })
        ));
    }

    #[test]
    fn mutate_nonexistent_fails() {
        let mut b = setup_builder();
        assert!(b.mutate_producer(ProducerKind::Miners, |_| {}).is_err());
    }
}
