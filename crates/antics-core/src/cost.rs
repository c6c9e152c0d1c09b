//! Multi-resource purchase costs and their escalation.
//!
//! A [`Cost`] lists how much of each resource a purchase requires. Producer
//! costs escalate after every unit bought: each entry is multiplied by the
//! growth factor and rounded to the nearest integer, never staying flat.

use crate::fixed::{Fixed64, scale_round};
use crate::id::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An amount of each resource required by a purchase. Entries are kept in
/// catalog order so display and affordability checks are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost(BTreeMap<ResourceKind, u64>);

impl Cost {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a cost from `(resource, amount)` pairs. Repeated resources add up.
    pub fn from_entries(entries: impl IntoIterator<Item = (ResourceKind, u64)>) -> Self {
        let mut cost = Self::new();
        for (resource, amount) in entries {
            cost.add(resource, amount);
        }
        cost
    }

    pub fn add(&mut self, resource: ResourceKind, amount: u64) {
        let entry = self.0.entry(resource).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Amount of `resource` required, 0 if not listed.
    pub fn get(&self, resource: ResourceKind) -> u64 {
        self.0.get(&resource).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u64)> + '_ {
        self.0.iter().map(|(&r, &a)| (r, a))
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The cost of the next unit after one has been bought at this cost.
    ///
    /// Every non-zero entry strictly increases, even when rounding
    /// `amount * growth` would land back on `amount`.
    pub fn escalated(&self, growth: Fixed64) -> Cost {
        Cost(
            self.0
                .iter()
                .map(|(&resource, &amount)| {
                    let next = if amount == 0 {
                        0
                    } else {
                        scale_round(amount, growth).max(amount.saturating_add(1))
                    };
                    (resource, next)
                })
                .collect(),
        )
    }

    /// Apply [`escalated`](Self::escalated) `times` times in a row.
    pub fn escalated_by(&self, growth: Fixed64, times: u64) -> Cost {
        let mut cost = self.clone();
        for _ in 0..times {
            cost = cost.escalated(growth);
        }
        cost
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (resource, amount) in self.iter() {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{amount} {resource}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<(ResourceKind, u64)> for Cost {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, u64)>>(iter: I) -> Self {
        Cost::from_entries(iter)
    }
}
