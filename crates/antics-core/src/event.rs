//! Simulation events.
//!
//! The world appends an [`Event`] whenever something observable happens:
//! a purchase, a boost starting or ending, a retirement, a visibility flip
//! or game completion. Events collect in a fixed-capacity [`EventBuffer`]
//! until the presentation layer calls
//! [`World::drain_events`](crate::world::World::drain_events); once full,
//! the oldest events are dropped.

use crate::fixed::{Fixed64, Ticks};
use crate::id::{EntityKind, ProducerKind, ResourceKind, UpgradeKind};
use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // -- Economy --
    ProducerPurchased {
        producer: ProducerKind,
        quantity: u64,
        owned: u64,
        tick: Ticks,
    },
    UpgradePurchased {
        upgrade: UpgradeKind,
        tick: Ticks,
    },

    // -- Boosts --
    BoostActivated {
        donor: ProducerKind,
        target: ProducerKind,
        rate_multiplier: Fixed64,
        remaining_ticks: i64,
        tick: Ticks,
    },
    BoostExpired {
        target: ProducerKind,
        tick: Ticks,
    },

    // -- Lifecycle --
    ProducerRetired {
        producer: ProducerKind,
        tick: Ticks,
    },
    ResourceRetired {
        resource: ResourceKind,
        tick: Ticks,
    },
    ProducerReplaced {
        old: ProducerKind,
        new: ProducerKind,
        transferred: u64,
        tick: Ticks,
    },

    // -- Visibility --
    Unlocked {
        entity: EntityKind,
        tick: Ticks,
    },
    Hidden {
        entity: EntityKind,
        tick: Ticks,
    },

    // -- Milestones --
    GameCompleted {
        tick: Ticks,
    },
}

/// Discriminant tag for event types, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ProducerPurchased,
    UpgradePurchased,
    BoostActivated,
    BoostExpired,
    ProducerRetired,
    ResourceRetired,
    ProducerReplaced,
    Unlocked,
    Hidden,
    GameCompleted,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ProducerPurchased { .. } => EventKind::ProducerPurchased,
            Event::UpgradePurchased { .. } => EventKind::UpgradePurchased,
            Event::BoostActivated { .. } => EventKind::BoostActivated,
            Event::BoostExpired { .. } => EventKind::BoostExpired,
            Event::ProducerRetired { .. } => EventKind::ProducerRetired,
            Event::ResourceRetired { .. } => EventKind::ResourceRetired,
            Event::ProducerReplaced { .. } => EventKind::ProducerReplaced,
            Event::Unlocked { .. } => EventKind::Unlocked,
            Event::Hidden { .. } => EventKind::Hidden,
            Event::GameCompleted { .. } => EventKind::GameCompleted,
        }
    }

    /// The tick this event occurred on.
    pub fn tick(&self) -> Ticks {
        match self {
            Event::ProducerPurchased { tick, .. }
            | Event::UpgradePurchased { tick, .. }
            | Event::BoostActivated { tick, .. }
            | Event::BoostExpired { tick, .. }
            | Event::ProducerRetired { tick, .. }
            | Event::ResourceRetired { tick, .. }
            | Event::ProducerReplaced { tick, .. }
            | Event::Unlocked { tick, .. }
            | Event::Hidden { tick, .. }
            | Event::GameCompleted { tick } => *tick,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBuffer
// ---------------------------------------------------------------------------

/// Bounded event queue. When full, pushing drops the oldest event.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    events: VecDeque<Event>,
    capacity: usize,
    /// Events discarded because the buffer was full.
    dropped: u64,
}

impl EventBuffer {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total events dropped since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Remove and return every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}
