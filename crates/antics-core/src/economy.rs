//! The economy engine: affordability checks and purchases.
//!
//! Running short of resources is not an error. Producer purchases stop at
//! the affordability boundary and report how many units were bought; upgrade
//! purchases are all-or-nothing and report [`UpgradeOutcome::Unaffordable`].
//! Errors are reserved for lookups of kinds the world does not contain.

use crate::cost::Cost;
use crate::event::Event;
use crate::fixed::{count_to_fixed128, split_fractional_wide, widen};
use crate::id::{ProducerKind, ResourceKind, UpgradeKind};
use crate::ledger::LedgerError;
use crate::producer::Boost;
use crate::upgrade::{BoostSpec, RateTarget, ReplaceSpec};
use crate::world::World;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// A lookup of a kind that is not part of this world's catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    #[error("unknown resource {0}")]
    UnknownResource(ResourceKind),
    #[error("unknown producer {0}")]
    UnknownProducer(ProducerKind),
    #[error("unknown upgrade {0}")]
    UnknownUpgrade(UpgradeKind),
    /// A ledger failure after affordability was already confirmed.
    #[error(transparent)]
    Ledger(LedgerError),
}

impl From<LedgerError> for EconomyError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownResource(kind) => EconomyError::UnknownResource(kind),
            other => EconomyError::Ledger(other),
        }
    }
}

/// Result of a producer purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseOutcome {
    /// Units asked for. 0 means "as many as possible".
    pub requested: u64,
    /// Units actually bought.
    pub bought: u64,
}

impl PurchaseOutcome {
    /// True when fewer units were bought than requested.
    pub fn is_partial(&self) -> bool {
        self.requested != 0 && self.bought < self.requested
    }
}

/// Result of an upgrade purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Purchased,
    AlreadyPurchased,
    /// The first shortfall found. Nothing was deducted.
    Unaffordable {
        resource: ResourceKind,
        required: u64,
        available: u64,
    },
}

impl UpgradeOutcome {
    pub fn is_purchased(&self) -> bool {
        matches!(self, UpgradeOutcome::Purchased)
    }
}

// ---------------------------------------------------------------------------
// Purchasing
// ---------------------------------------------------------------------------

impl World {
    /// Buy up to `requested` units of a producer, one at a time.
    ///
    /// Each unit is paid at the current cost, after which the cost grows by
    /// `cost_growth`. The loop stops at the first unit that cannot be
    /// afforded. `requested == 0` buys until resources run out. Retired
    /// producers cannot be bought.
    pub fn purchase_producer(
        &mut self,
        kind: ProducerKind,
        requested: u64,
    ) -> Result<PurchaseOutcome, EconomyError> {
        let growth = self.config.cost_growth;
        let limit = if requested == 0 { u64::MAX } else { requested };
        let mut bought = 0;

        if self.producer(kind)?.is_active() {
            while bought < limit {
                let cost = self.producer(kind)?.purchase_cost.clone();
                match self.ledger.check_affordable(&cost) {
                    Ok(()) => {}
                    Err(LedgerError::InsufficientFunds { .. }) => break,
                    Err(err) => return Err(err.into()),
                }
                self.ledger.spend_all(&cost)?;
                self.producers
                    .get_mut(kind)
                    .ok_or(EconomyError::UnknownProducer(kind))?
                    .record_purchase(growth);
                bought += 1;
            }
        }

        if bought > 0 {
            let owned = self.producer(kind)?.owned_count;
            tracing::debug!(producer = %kind, bought, owned, "producer purchased");
            self.emit(Event::ProducerPurchased {
                producer: kind,
                quantity: bought,
                owned,
                tick: self.state.tick,
            });
        }
        Ok(PurchaseOutcome { requested, bought })
    }

    /// How many units of `kind` could be bought right now, up to `limit`,
    /// walking the same cost ladder as [`purchase_producer`](Self::purchase_producer).
    pub fn affordable_count(&self, kind: ProducerKind, limit: u64) -> Result<u64, EconomyError> {
        let producer = self.producer(kind)?;
        if !producer.is_active() {
            return Ok(0);
        }
        let mut budget: BTreeMap<ResourceKind, u64> = BTreeMap::new();
        for resource in producer.purchase_cost.resources() {
            budget.insert(resource, self.resource_total(resource)?);
        }

        let growth = self.config.cost_growth;
        let mut cost = producer.purchase_cost.clone();
        let mut count = 0;
        while count < limit && covers(&budget, &cost) {
            for (resource, amount) in cost.iter() {
                if let Some(left) = budget.get_mut(&resource) {
                    *left -= amount;
                }
            }
            cost = cost.escalated(growth);
            count += 1;
        }
        Ok(count)
    }

    /// Whether `n` units can be bought in sequence right now. `n == 0` asks
    /// whether at least one unit is affordable.
    pub fn can_afford_producer(&self, kind: ProducerKind, n: u64) -> Result<bool, EconomyError> {
        let wanted = n.max(1);
        Ok(self.affordable_count(kind, wanted)? >= wanted)
    }

    /// Whether the upgrade is still for sale and fully affordable.
    pub fn can_afford_upgrade(&self, kind: UpgradeKind) -> Result<bool, EconomyError> {
        let upgrade = self.upgrade(kind)?;
        Ok(!upgrade.purchased && self.ledger.can_afford(&upgrade.cost))
    }

    /// Buy a one-time upgrade and apply its effects.
    ///
    /// All cost entries are checked before any is deducted. On success the
    /// rate modifiers are multiplied into their targets, then any boost or
    /// replacement is carried out.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<UpgradeOutcome, EconomyError> {
        let upgrade = self.upgrade(kind)?;
        if upgrade.purchased {
            return Ok(UpgradeOutcome::AlreadyPurchased);
        }
        let cost: Cost = upgrade.cost.clone();
        let modifiers: Vec<_> = upgrade
            .rate_modifiers
            .iter()
            .map(|(&target, &multiplier)| (target, multiplier))
            .collect();
        let boost = upgrade.boost.clone();
        let replace = upgrade.replace.clone();

        // Every effect target must resolve before anything is spent.
        for (target, _) in &modifiers {
            if let RateTarget::Producer(p) = target {
                self.producer(*p)?;
            }
        }
        if let Some(spec) = &boost {
            self.producer(spec.donor)?;
            self.producer(spec.target)?;
            if let Some(resource) = spec.retire {
                self.resource(resource)?;
            }
        }
        if let Some(spec) = &replace {
            self.producer(spec.old)?;
            self.producer(spec.new)?;
            if let Some(resource) = spec.retire {
                self.resource(resource)?;
            }
        }

        match self.ledger.check_affordable(&cost) {
            Ok(()) => {}
            Err(LedgerError::InsufficientFunds {
                resource,
                required,
                available,
            }) => {
                return Ok(UpgradeOutcome::Unaffordable {
                    resource,
                    required,
                    available,
                });
            }
            Err(err) => return Err(err.into()),
        }
        self.ledger.spend_all(&cost)?;
        if let Some(upgrade) = self.upgrades.get_mut(kind) {
            upgrade.purchased = true;
        }
        tracing::debug!(upgrade = %kind, cost = %cost, "upgrade purchased");
        self.emit(Event::UpgradePurchased {
            upgrade: kind,
            tick: self.state.tick,
        });

        for (target, multiplier) in modifiers {
            match target {
                RateTarget::Producer(p) => {
                    if let Some(producer) = self.producers.get_mut(p) {
                        producer.apply_multiplier(multiplier);
                    }
                }
                RateTarget::Click => {
                    self.click_multiplier = self.click_multiplier.saturating_mul(multiplier);
                }
            }
        }
        if let Some(spec) = boost {
            self.activate_boost(&spec);
        }
        if let Some(spec) = replace {
            self.replace_producer(&spec);
        }
        Ok(UpgradeOutcome::Purchased)
    }

    /// Manual gather: add `floor(gather_amount * click * debug)` whole units
    /// to the gather resource. Returns the amount added.
    pub fn gather(&mut self) -> Result<u64, EconomyError> {
        let amount = count_to_fixed128(self.config.gather_amount)
            .saturating_mul(widen(self.click_multiplier))
            .saturating_mul(widen(self.config.debug_multiplier));
        let (whole, _) = split_fractional_wide(amount);
        self.ledger.deposit(self.gather_resource, whole)?;
        Ok(whole)
    }

    // -----------------------------------------------------------------------
    // Effects
    // -----------------------------------------------------------------------

    /// Sacrifice the donor line into a boost on the target line.
    fn activate_boost(&mut self, spec: &BoostSpec) {
        let tick = self.state.tick;
        let donor_count = self.producers.get(spec.donor).map_or(0, |p| p.owned_count);
        let rate_multiplier = Boost::strength(
            donor_count,
            self.config.boost_divisor,
            self.config.boost_scale,
        );
        if let Some(target) = self.producers.get_mut(spec.target) {
            target.active_boost = Some(Boost {
                donor: spec.donor,
                target: spec.target,
                rate_multiplier,
                remaining_ticks: spec.duration_ticks,
            });
        }
        tracing::debug!(
            donor = %spec.donor,
            target = %spec.target,
            %rate_multiplier,
            ticks = spec.duration_ticks,
            "boost activated"
        );
        self.emit(Event::BoostActivated {
            donor: spec.donor,
            target: spec.target,
            rate_multiplier,
            remaining_ticks: spec.duration_ticks,
            tick,
        });
        self.retire_producer(spec.donor, None);
        if let Some(resource) = spec.retire {
            self.retire_resource(resource);
        }
    }

    /// Retire the old line and seed the new one with
    /// `round(old_count / divisor)` free units.
    fn replace_producer(&mut self, spec: &ReplaceSpec) {
        let growth = self.config.cost_growth;
        let old_count = self.producers.get(spec.old).map_or(0, |p| p.owned_count);
        let transferred = rounded_div(old_count, spec.divisor);

        self.retire_producer(spec.old, Some(spec.new));
        if let Some(resource) = spec.retire {
            self.retire_resource(resource);
        }
        if let Some(new) = self.producers.get_mut(spec.new) {
            for _ in 0..transferred {
                new.record_purchase(growth);
            }
        }
        tracing::info!(old = %spec.old, new = %spec.new, transferred, "producer replaced");
        self.emit(Event::ProducerReplaced {
            old: spec.old,
            new: spec.new,
            transferred,
            tick: self.state.tick,
        });
    }

    fn retire_producer(&mut self, kind: ProducerKind, replaced_by: Option<ProducerKind>) {
        let retired = self
            .producers
            .get_mut(kind)
            .is_some_and(|p| p.retire(replaced_by));
        if retired {
            tracing::info!(producer = %kind, "producer retired");
            self.emit(Event::ProducerRetired {
                producer: kind,
                tick: self.state.tick,
            });
        }
    }

    fn retire_resource(&mut self, kind: ResourceKind) {
        if let Ok(true) = self.ledger.retire(kind) {
            tracing::info!(resource = %kind, "resource retired");
            self.emit(Event::ResourceRetired {
                resource: kind,
                tick: self.state.tick,
            });
        }
    }
}

/// Whether every entry of `cost` is covered by `budget`.
fn covers(budget: &BTreeMap<ResourceKind, u64>, cost: &Cost) -> bool {
    cost.iter()
        .all(|(resource, amount)| budget.get(&resource).is_some_and(|&left| left >= amount))
}

/// `n / d` rounded to the nearest integer, halves up. `d` must be non-zero.
fn rounded_div(n: u64, d: u64) -> u64 {
    if d == 0 {
        return 0;
    }
    let q = n / d;
    let r = n % d;
    if r >= d - r { q + 1 } else { q }
}
