//! The world: aggregate root owning every resource, producer and upgrade.
//!
//! A [`World`] is constructed once from a validated [`Catalog`] and a
//! [`SimConfig`]. After that it only changes through [`World::tick`],
//! the purchase calls and [`World::gather`]. Nothing inside is shared.

use crate::catalog::Catalog;
use crate::completion_log::CompletionLog;
use crate::cost::Cost;
use crate::economy::EconomyError;
use crate::event::{Event, EventBuffer};
use crate::fixed::{Fixed64, Fixed128, Ticks};
use crate::id::{EntityKind, ProducerKind, ResourceKind, UpgradeKind};
use crate::ledger::{Ledger, Resource};
use crate::producer::{Producer, ProducerRegistry};
use crate::sim::{SimConfig, SimState};
use crate::unlock::{UnlockPredicate, WorldView};
use crate::upgrade::{Upgrade, UpgradeRegistry};
use std::collections::BTreeMap;

pub struct World {
    pub(crate) ledger: Ledger,
    pub(crate) producers: ProducerRegistry,
    pub(crate) upgrades: UpgradeRegistry,
    /// Unlock predicates for resources. The ledger itself knows nothing of
    /// visibility rules.
    pub(crate) resource_unlocks: BTreeMap<ResourceKind, UnlockPredicate>,
    pub(crate) click_multiplier: Fixed64,
    pub(crate) gather_resource: ResourceKind,
    pub(crate) config: SimConfig,
    pub(crate) state: SimState,
    pub(crate) events: EventBuffer,
    pub(crate) completion_log: Option<CompletionLog>,
}

impl World {
    /// Build a fresh world from a validated catalog.
    ///
    /// Producers with a non-zero starting count get their cost ladder
    /// advanced as if those units had been bought.
    pub fn new(catalog: &Catalog, config: SimConfig) -> Self {
        let mut ledger = Ledger::new();
        let mut resource_unlocks = BTreeMap::new();
        for def in catalog.resources() {
            ledger.insert(Resource::new(def.kind, def.starts_visible));
            resource_unlocks.insert(def.kind, def.unlock.clone());
        }

        let mut producers = ProducerRegistry::new();
        for def in catalog.producers() {
            producers.insert(Producer {
                kind: def.kind,
                owned_count: def.starting_count,
                unit_output: def.outputs.clone(),
                purchase_cost: def.cost.escalated_by(config.cost_growth, def.starting_count),
                visible: def.starts_visible,
                unlock: def.unlock.clone(),
                lifecycle: Default::default(),
                active_boost: None,
                replaced_by: None,
            });
        }

        let mut upgrades = UpgradeRegistry::new();
        for def in catalog.upgrades() {
            upgrades.insert(Upgrade {
                kind: def.kind,
                purchased: false,
                cost: def.cost.clone(),
                rate_modifiers: def.rate_modifiers.clone(),
                unlock: def.unlock.clone(),
                boost: def.boost.clone(),
                replace: def.replace.clone(),
                display_text: def.display_text.clone(),
                visible: false,
            });
        }

        let completion_log = config.completion_log.clone().map(CompletionLog::new);
        let events = EventBuffer::new(config.event_capacity);

        Self {
            ledger,
            producers,
            upgrades,
            resource_unlocks,
            click_multiplier: Fixed64::ONE,
            gather_resource: catalog.gather_resource(),
            config,
            state: SimState::new(),
            events,
            completion_log,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> Ticks {
        self.state.tick
    }

    pub fn click_multiplier(&self) -> Fixed64 {
        self.click_multiplier
    }

    /// True once every upgrade has been purchased and a tick has observed it.
    pub fn is_complete(&self) -> bool {
        self.state.completed
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn producers(&self) -> &ProducerRegistry {
        &self.producers
    }

    pub fn upgrades(&self) -> &UpgradeRegistry {
        &self.upgrades
    }

    pub fn resource(&self, kind: ResourceKind) -> Result<&Resource, EconomyError> {
        Ok(self.ledger.get(kind)?)
    }

    pub fn producer(&self, kind: ProducerKind) -> Result<&Producer, EconomyError> {
        self.producers
            .get(kind)
            .ok_or(EconomyError::UnknownProducer(kind))
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> Result<&Upgrade, EconomyError> {
        self.upgrades
            .get(kind)
            .ok_or(EconomyError::UnknownUpgrade(kind))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn resource_total(&self, kind: ResourceKind) -> Result<u64, EconomyError> {
        self.resource(kind).map(|r| r.total)
    }

    pub fn resource_progress(&self, kind: ResourceKind) -> Result<Fixed64, EconomyError> {
        self.resource(kind).map(|r| r.progress)
    }

    pub fn producer_count(&self, kind: ProducerKind) -> Result<u64, EconomyError> {
        self.producer(kind).map(|p| p.owned_count)
    }

    /// Cost of the next unit of `kind`.
    pub fn producer_cost(&self, kind: ProducerKind) -> Result<&Cost, EconomyError> {
        self.producer(kind).map(|p| &p.purchase_cost)
    }

    pub fn upgrade_purchased(&self, kind: UpgradeKind) -> Result<bool, EconomyError> {
        self.upgrade(kind).map(|u| u.purchased)
    }

    /// 1 once purchased, otherwise 0.
    pub fn upgrade_total(&self, kind: UpgradeKind) -> Result<u64, EconomyError> {
        self.upgrade(kind).map(Upgrade::owned_count)
    }

    /// Whether the entity is currently shown. Retired entities are never
    /// visible.
    pub fn get_visibility(&self, entity: impl Into<EntityKind>) -> Result<bool, EconomyError> {
        match entity.into() {
            EntityKind::Resource(kind) => self.resource(kind).map(|r| r.visible && r.is_active()),
            EntityKind::Producer(kind) => self.producer(kind).map(|p| p.visible && p.is_active()),
            EntityKind::Upgrade(kind) => self.upgrade(kind).map(|u| u.visible),
        }
    }

    /// Amount of `resource` all producers will add in one tick.
    pub fn production_per_tick(&self, resource: ResourceKind) -> Result<Fixed128, EconomyError> {
        self.resource(resource)?;
        Ok(self
            .producers
            .iter()
            .map(|p| p.output_per_tick(resource, self.config.debug_multiplier))
            .fold(Fixed128::ZERO, |acc, v| acc.saturating_add(v)))
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Take every event recorded since the last drain, oldest first.
    /// Drivers should drain every tick; past `event_capacity` the oldest
    /// events are dropped.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Read-only view of pending events.
    pub fn pending_events(&self) -> &EventBuffer {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

impl WorldView for World {
    fn resource_total(&self, kind: ResourceKind) -> u64 {
        self.ledger.get(kind).map(|r| r.total).unwrap_or(0)
    }

    fn producer_count(&self, kind: ProducerKind) -> u64 {
        self.producers.get(kind).map_or(0, |p| p.owned_count)
    }

    fn upgrade_purchased(&self, kind: UpgradeKind) -> bool {
        self.upgrades.get(kind).is_some_and(|u| u.purchased)
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.state.tick)
            .field("resources", &self.ledger.len())
            .field("producers", &self.producers.len())
            .field("upgrades", &self.upgrades.len())
            .field("click_multiplier", &self.click_multiplier)
            .field("pending_events", &self.events.len())
            .finish()
    }
}
