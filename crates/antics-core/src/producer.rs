//! Producers: owned units that generate resources every tick.
//!
//! A producer may output several resources at once. Per-unit rates start at
//! the catalog values and are multiplied in place by purchased upgrades. A
//! temporary [`Boost`] adds `rate_multiplier` on top of the base factor of 1.

use crate::cost::Cost;
use crate::fixed::{Fixed64, Fixed128, count_to_fixed64, count_to_fixed128, widen};
use crate::id::{ProducerKind, ResourceKind};
use crate::ledger::Lifecycle;
use crate::unlock::UnlockPredicate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Boost
// ---------------------------------------------------------------------------

/// A temporary production bonus paid for by sacrificing another producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    /// The producer that was spent to buy the boost.
    pub donor: ProducerKind,
    /// The producer whose output is boosted.
    pub target: ProducerKind,
    /// Extra output factor. Recomputed every tick from the donor's count.
    pub rate_multiplier: Fixed64,
    /// Ticks left. The boost is cleared once this drops below zero.
    pub remaining_ticks: i64,
}

impl Boost {
    /// Boost strength granted by `donor_count` units: `count / divisor * scale`.
    pub fn strength(donor_count: u64, divisor: u64, scale: Fixed64) -> Fixed64 {
        if divisor == 0 {
            return Fixed64::ZERO;
        }
        let per = count_to_fixed64(donor_count) / count_to_fixed64(divisor);
        per.saturating_mul(scale)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ticks < 0
    }
}

// ---------------------------------------------------------------------------
// Producer
// ---------------------------------------------------------------------------

/// Runtime state of one producer line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub kind: ProducerKind,
    pub owned_count: u64,
    /// Output per unit per tick, keyed by resource. Upgrades multiply these.
    pub unit_output: BTreeMap<ResourceKind, Fixed64>,
    /// Cost of the next unit.
    pub purchase_cost: Cost,
    pub visible: bool,
    pub unlock: UnlockPredicate,
    pub lifecycle: Lifecycle,
    pub active_boost: Option<Boost>,
    /// Set when an upgrade replaced this line with another producer.
    pub replaced_by: Option<ProducerKind>,
}

impl Producer {
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// The current boost strength, or zero when not boosted.
    pub fn boost_multiplier(&self) -> Fixed64 {
        match &self.active_boost {
            Some(boost) if !boost.is_expired() => boost.rate_multiplier,
            _ => Fixed64::ZERO,
        }
    }

    /// Effective output of a single unit for `resource`, including any boost.
    pub fn unit_rate(&self, resource: ResourceKind) -> Fixed64 {
        let base = self.unit_output.get(&resource).copied().unwrap_or(Fixed64::ZERO);
        base.saturating_mul(Fixed64::ONE.saturating_add(self.boost_multiplier()))
    }

    /// Total output of this line for `resource` in one tick.
    ///
    /// `rate * owned_count * (1 + boost) * debug_multiplier`, computed in
    /// Q64.64; retired lines produce nothing.
    pub fn output_per_tick(&self, resource: ResourceKind, debug_multiplier: Fixed64) -> Fixed128 {
        if !self.is_active() || self.owned_count == 0 {
            return Fixed128::ZERO;
        }
        let base = self.unit_output.get(&resource).copied().unwrap_or(Fixed64::ZERO);
        let factor = Fixed128::ONE.saturating_add(widen(self.boost_multiplier()));
        widen(base)
            .saturating_mul(factor)
            .saturating_mul(count_to_fixed128(self.owned_count))
            .saturating_mul(widen(debug_multiplier))
    }

    pub fn outputs(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.unit_output.keys().copied()
    }

    /// Record one bought unit and escalate the next unit's cost.
    pub fn record_purchase(&mut self, growth: Fixed64) {
        self.owned_count = self.owned_count.saturating_add(1);
        self.purchase_cost = self.purchase_cost.escalated(growth);
    }

    /// Multiply every output rate by `multiplier`.
    pub fn apply_multiplier(&mut self, multiplier: Fixed64) {
        for rate in self.unit_output.values_mut() {
            *rate = rate.saturating_mul(multiplier);
        }
    }

    /// Retire this line permanently. Returns false if it was already retired.
    pub fn retire(&mut self, replaced_by: Option<ProducerKind>) -> bool {
        let was_active = self.is_active();
        self.lifecycle = Lifecycle::Retired;
        self.visible = false;
        if replaced_by.is_some() {
            self.replaced_by = replaced_by;
        }
        was_active
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Every producer line in the world, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProducerRegistry {
    producers: BTreeMap<ProducerKind, Producer>,
}

impl ProducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, producer: Producer) {
        self.producers.insert(producer.kind, producer);
    }

    pub fn get(&self, kind: ProducerKind) -> Option<&Producer> {
        self.producers.get(&kind)
    }

    pub fn get_mut(&mut self, kind: ProducerKind) -> Option<&mut Producer> {
        self.producers.get_mut(&kind)
    }

    pub fn contains(&self, kind: ProducerKind) -> bool {
        self.producers.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Producer> {
        self.producers.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Producer> {
        self.producers.values_mut()
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Sum the output of every line for every resource produced this tick.
    pub fn production(&self, debug_multiplier: Fixed64) -> BTreeMap<ResourceKind, Fixed128> {
        let mut totals: BTreeMap<ResourceKind, Fixed128> = BTreeMap::new();
        for producer in self.producers.values() {
            for resource in producer.outputs() {
                let amount = producer.output_per_tick(resource, debug_multiplier);
                let entry = totals.entry(resource).or_insert(Fixed128::ZERO);
                *entry = entry.saturating_add(amount);
            }
        }
        totals
    }
}
