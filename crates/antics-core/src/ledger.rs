//! The resource ledger: integral totals plus a fractional carry.
//!
//! Production arrives in fractional amounts every tick. The ledger keeps the
//! whole part in `total` and the remainder in `progress`, which always stays
//! in `[0, 1)`. Spending only touches `total`.

use crate::cost::Cost;
use crate::fixed::{Fixed64, Fixed128, split_fractional_wide, widen};
use crate::id::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether an entity is still part of the game. Retirement is one-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Active,
    /// Permanently removed from play (sacrificed into a boost or replaced).
    Retired,
}

/// One accumulated resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    /// Whole units accumulated and not yet spent.
    pub total: u64,
    /// Fractional carry not yet rounded into `total`. Always in `[0, 1)`.
    pub progress: Fixed64,
    /// Result of the last unlock evaluation.
    pub visible: bool,
    pub lifecycle: Lifecycle,
}

impl Resource {
    pub fn new(kind: ResourceKind, visible: bool) -> Self {
        Self {
            kind,
            total: 0,
            progress: Fixed64::ZERO,
            visible,
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// Add a fractional amount, carrying whole units from `progress` into
    /// `total`. Negative amounts are ignored.
    pub fn accumulate(&mut self, amount: Fixed64) {
        self.accumulate_wide(widen(amount));
    }

    /// [`Resource::accumulate`] for a Q64.64 amount, as produced by a tick.
    pub fn accumulate_wide(&mut self, amount: Fixed128) {
        if amount <= Fixed128::ZERO {
            return;
        }
        let (whole, frac) = split_fractional_wide(widen(self.progress).saturating_add(amount));
        self.total = self.total.saturating_add(whole);
        self.progress = frac;
    }
}

/// Errors raised by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient {resource}: need {required}, have {available}")]
    InsufficientFunds {
        resource: ResourceKind,
        required: u64,
        available: u64,
    },
    #[error("resource {0} is not in the ledger")]
    UnknownResource(ResourceKind),
}

/// Holds every resource the world tracks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    resources: BTreeMap<ResourceKind, Resource>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: Resource) {
        self.resources.insert(resource.kind, resource);
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.resources.contains_key(&kind)
    }

    pub fn get(&self, kind: ResourceKind) -> Result<&Resource, LedgerError> {
        self.resources
            .get(&kind)
            .ok_or(LedgerError::UnknownResource(kind))
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> Result<&mut Resource, LedgerError> {
        self.resources
            .get_mut(&kind)
            .ok_or(LedgerError::UnknownResource(kind))
    }

    pub fn total(&self, kind: ResourceKind) -> Result<u64, LedgerError> {
        self.get(kind).map(|r| r.total)
    }

    /// Add produced amount to a resource. Retired resources stay frozen.
    pub fn accumulate(&mut self, kind: ResourceKind, amount: Fixed64) -> Result<(), LedgerError> {
        self.accumulate_wide(kind, widen(amount))
    }

    pub fn accumulate_wide(&mut self, kind: ResourceKind, amount: Fixed128) -> Result<(), LedgerError> {
        let resource = self.get_mut(kind)?;
        if resource.is_active() {
            resource.accumulate_wide(amount);
        }
        Ok(())
    }

    /// Add whole units directly to `total`, leaving `progress` untouched.
    pub fn deposit(&mut self, kind: ResourceKind, amount: u64) -> Result<(), LedgerError> {
        let resource = self.get_mut(kind)?;
        if resource.is_active() {
            resource.total = resource.total.saturating_add(amount);
        }
        Ok(())
    }

    /// Deduct `amount` from a single resource.
    pub fn spend(&mut self, kind: ResourceKind, amount: u64) -> Result<(), LedgerError> {
        let resource = self.get_mut(kind)?;
        if resource.total < amount {
            return Err(LedgerError::InsufficientFunds {
                resource: kind,
                required: amount,
                available: resource.total,
            });
        }
        resource.total -= amount;
        Ok(())
    }

    /// Check every entry of `cost` against the current totals.
    ///
    /// Returns the first shortfall as `InsufficientFunds`.
    pub fn check_affordable(&self, cost: &Cost) -> Result<(), LedgerError> {
        for (kind, required) in cost.iter() {
            let available = self.total(kind)?;
            if available < required {
                return Err(LedgerError::InsufficientFunds {
                    resource: kind,
                    required,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Whether every entry of `cost` is covered. Unknown resources count as
    /// unaffordable.
    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.check_affordable(cost).is_ok()
    }

    /// Deduct every entry of `cost`, or nothing at all.
    ///
    /// All entries are checked before any total changes, so a failed call
    /// leaves the ledger untouched.
    pub fn spend_all(&mut self, cost: &Cost) -> Result<(), LedgerError> {
        self.check_affordable(cost)?;
        for (kind, amount) in cost.iter() {
            self.spend(kind, amount)?;
        }
        Ok(())
    }

    /// Permanently retire a resource. Its total is frozen from now on.
    pub fn retire(&mut self, kind: ResourceKind) -> Result<bool, LedgerError> {
        let resource = self.get_mut(kind)?;
        let was_active = resource.is_active();
        resource.lifecycle = Lifecycle::Retired;
        resource.visible = false;
        Ok(was_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Resource> {
        self.resources.values_mut()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
