//! The simulation clock: one call to [`World::tick`] advances one step.
//!
//! Phases run strictly in order:
//!
//! 1. **Produce** -- every producer's output is summed per resource and
//!    pushed through the ledger's fractional accumulator.
//! 2. **Boost decay** -- active boosts lose one tick and are recomputed
//!    from the donor's count; boosts that drop below zero are cleared.
//! 3. **Unlock** -- every unlock predicate is re-evaluated and stored as
//!    the entity's visibility.
//! 4. **Terminal check** -- once every upgrade is purchased the world is
//!    marked complete and a snapshot is appended to the completion log.

use crate::completion_log::CompletionEntry;
use crate::event::Event;
use crate::id::{EntityKind, ProducerKind};
use crate::producer::Boost;
use crate::sim::CompletionPolicy;
use crate::world::World;

impl World {
    /// Advance the world by one tick.
    pub fn tick(&mut self) {
        self.state.tick += 1;
        self.produce();
        self.decay_boosts();
        self.evaluate_unlocks();
        self.check_completion();
    }

    /// Run `n` ticks back to back.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    // -----------------------------------------------------------------------
    // Phase 1: produce
    // -----------------------------------------------------------------------

    fn produce(&mut self) {
        let production = self.producers.production(self.config.debug_multiplier);
        for (resource, amount) in production {
            if let Err(err) = self.ledger.accumulate_wide(resource, amount) {
                tracing::warn!(%resource, %err, "production dropped");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Phase 2: boost decay
    // -----------------------------------------------------------------------

    fn decay_boosts(&mut self) {
        let tick = self.state.tick;
        let divisor = self.config.boost_divisor;
        let scale = self.config.boost_scale;

        let boosted: Vec<(ProducerKind, ProducerKind)> = self
            .producers
            .iter()
            .filter_map(|p| p.active_boost.as_ref().map(|b| (p.kind, b.donor)))
            .collect();

        for (target, donor) in boosted {
            let donor_count = self.producers.get(donor).map_or(0, |p| p.owned_count);
            let Some(producer) = self.producers.get_mut(target) else {
                continue;
            };
            let Some(boost) = producer.active_boost.as_mut() else {
                continue;
            };
            boost.remaining_ticks -= 1;
            if boost.is_expired() {
                producer.active_boost = None;
                tracing::debug!(%target, tick, "boost expired");
                self.emit(Event::BoostExpired { target, tick });
            } else {
                boost.rate_multiplier = Boost::strength(donor_count, divisor, scale);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Phase 3: unlock re-evaluation
    // -----------------------------------------------------------------------

    fn evaluate_unlocks(&mut self) {
        let mut results: Vec<(EntityKind, bool)> = Vec::new();
        for resource in self.ledger.iter() {
            let unlocked = self
                .resource_unlocks
                .get(&resource.kind)
                .is_some_and(|p| p.evaluate(self));
            results.push((resource.kind.into(), unlocked && resource.is_active()));
        }
        for producer in self.producers.iter() {
            let unlocked = producer.unlock.evaluate(self);
            results.push((producer.kind.into(), unlocked && producer.is_active()));
        }
        for upgrade in self.upgrades.iter() {
            results.push((upgrade.kind.into(), upgrade.unlock.evaluate(self)));
        }

        for (entity, visible) in results {
            if self.set_visible(entity, visible) {
                let tick = self.state.tick;
                if visible {
                    tracing::info!(%entity, tick, "unlocked");
                    self.emit(Event::Unlocked { entity, tick });
                } else {
                    tracing::debug!(%entity, tick, "hidden");
                    self.emit(Event::Hidden { entity, tick });
                }
            }
        }
    }

    /// Store a visibility flag. Returns true if it changed.
    fn set_visible(&mut self, entity: EntityKind, visible: bool) -> bool {
        let slot = match entity {
            EntityKind::Resource(kind) => self.ledger.get_mut(kind).ok().map(|r| &mut r.visible),
            EntityKind::Producer(kind) => self.producers.get_mut(kind).map(|p| &mut p.visible),
            EntityKind::Upgrade(kind) => self.upgrades.get_mut(kind).map(|u| &mut u.visible),
        };
        match slot {
            Some(flag) if *flag != visible => {
                *flag = visible;
                true
            }
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Phase 4: terminal check
    // -----------------------------------------------------------------------

    fn check_completion(&mut self) {
        if !self.upgrades.all_purchased() {
            return;
        }
        let tick = self.state.tick;
        if !self.state.completed {
            self.state.completed = true;
            tracing::info!(tick, "every upgrade purchased");
            self.emit(Event::GameCompleted { tick });
        }

        let due = match self.config.completion_policy {
            CompletionPolicy::Once => !self.state.completion_logged,
            CompletionPolicy::EveryTick => true,
        };
        if !due {
            return;
        }
        self.state.completion_logged = true;

        let Some(log) = &self.completion_log else {
            return;
        };
        let entry = CompletionEntry::capture(self);
        if let Err(err) = log.append(&entry) {
            tracing::warn!(path = %log.path().display(), %err, "failed to write completion log");
        }
    }
}
