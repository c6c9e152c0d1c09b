//! Read-only query API for the presentation layer.
//!
//! Snapshot types are owned copies. No references into world storage
//! escape, so a renderer can hold them across ticks.

use crate::cost::Cost;
use crate::economy::EconomyError;
use crate::fixed::{Fixed64, Fixed128, Ticks, fixed64_to_f64};
use crate::id::{ProducerKind, ResourceKind, UpgradeKind};
use crate::producer::Boost;
use crate::world::World;

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot {
    pub kind: ResourceKind,
    pub total: u64,
    /// Fractional carry in `[0, 1)`.
    pub progress: Fixed64,
    pub visible: bool,
    pub retired: bool,
    /// Amount added by the next tick's production.
    pub per_tick: Fixed128,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProducerSnapshot {
    pub kind: ProducerKind,
    pub owned: u64,
    /// Cost of the next unit.
    pub cost: Cost,
    pub visible: bool,
    pub retired: bool,
    pub affordable: bool,
    pub rate_text: String,
    pub boost: Option<Boost>,
    pub replaced_by: Option<ProducerKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeSnapshot {
    pub kind: UpgradeKind,
    pub purchased: bool,
    pub cost: Cost,
    pub visible: bool,
    pub affordable: bool,
    pub display_text: String,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub tick: Ticks,
    pub click_multiplier: Fixed64,
    pub complete: bool,
    pub resources: Vec<ResourceSnapshot>,
    pub producers: Vec<ProducerSnapshot>,
    pub upgrades: Vec<UpgradeSnapshot>,
}

impl World {
    /// Per-unit rates of a producer, including upgrades and any active boost.
    ///
    /// Formatted as `+0.50 Food/s | +0.10 Sticks/s`, with
    /// ` (boost x1.25, 12s)` appended while a boost is running.
    pub fn gather_rate_text(&self, kind: ProducerKind) -> Result<String, EconomyError> {
        let producer = self.producer(kind)?;
        let debug = self.config.debug_multiplier;
        let mut text = producer
            .outputs()
            .map(|resource| {
                let rate = producer.unit_rate(resource).saturating_mul(debug);
                format!("+{:.2} {resource}/s", fixed64_to_f64(rate))
            })
            .collect::<Vec<_>>()
            .join(" | ");
        if let Some(boost) = producer.active_boost.as_ref().filter(|b| !b.is_expired()) {
            let factor = Fixed64::ONE.saturating_add(boost.rate_multiplier);
            text.push_str(&format!(
                " (boost x{:.2}, {}s)",
                fixed64_to_f64(factor),
                boost.remaining_ticks
            ));
        }
        Ok(text)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let resources = self
            .ledger
            .iter()
            .map(|r| ResourceSnapshot {
                kind: r.kind,
                total: r.total,
                progress: r.progress,
                visible: r.visible && r.is_active(),
                retired: !r.is_active(),
                per_tick: if r.is_active() {
                    self.production_per_tick(r.kind).unwrap_or(Fixed128::ZERO)
                } else {
                    Fixed128::ZERO
                },
            })
            .collect();

        let producers = self
            .producers
            .iter()
            .map(|p| ProducerSnapshot {
                kind: p.kind,
                owned: p.owned_count,
                cost: p.purchase_cost.clone(),
                visible: p.visible && p.is_active(),
                retired: !p.is_active(),
                affordable: p.is_active() && self.ledger.can_afford(&p.purchase_cost),
                rate_text: self.gather_rate_text(p.kind).unwrap_or_default(),
                boost: p.active_boost.clone(),
                replaced_by: p.replaced_by,
            })
            .collect();

        let upgrades = self
            .upgrades
            .iter()
            .map(|u| UpgradeSnapshot {
                kind: u.kind,
                purchased: u.purchased,
                cost: u.cost.clone(),
                visible: u.visible,
                affordable: !u.purchased && self.ledger.can_afford(&u.cost),
                display_text: u.display_text.clone(),
            })
            .collect();

        WorldSnapshot {
            tick: self.state.tick,
            click_multiplier: self.click_multiplier,
            complete: self.state.completed,
            resources,
            producers,
            upgrades,
        }
    }
}
