//! Antics Core -- the simulation engine for an idle ant colony.
//!
//! This crate provides the resource ledger, producer and upgrade registries,
//! the purchase economy, unlock predicates, events, queries and deterministic
//! fixed-point arithmetic behind the game. Rendering and input live elsewhere
//! and talk to the core only through [`world::World`].
//!
//! # Four-Phase Tick
//!
//! Each call to [`world::World::tick`] advances the simulation by one tick
//! through the following phases:
//!
//! 1. **Produce** -- Every producer adds `rate * owned * (1 + boost) * debug`
//!    to each resource it outputs, carried through fractional progress.
//! 2. **Boost decay** -- Active boosts count down and are recomputed from
//!    the donor's count; expired boosts are cleared.
//! 3. **Unlock** -- Every unlock predicate is re-evaluated into visibility.
//! 4. **Terminal check** -- Once every upgrade is bought the world is
//!    marked complete and a snapshot is appended to the completion log.
//!
//! Purchases run between ticks and are synchronous:
//!
//! ```rust
//! use antics_core::catalog::Catalog;
//! use antics_core::id::ProducerKind;
//! use antics_core::sim::SimConfig;
//! use antics_core::world::World;
//!
//! let catalog = Catalog::standard().unwrap();
//! let mut world = World::new(&catalog, SimConfig::default());
//! for _ in 0..10 {
//!     world.gather().unwrap();
//! }
//! let outcome = world.purchase_producer(ProducerKind::Ants, 1).unwrap();
//! assert_eq!(outcome.bought, 1);
//! world.tick();
//! ```
//!
//! # Key Types
//!
//! - [`world::World`] -- Aggregate root; owns every entity.
//! - [`catalog::Catalog`] -- Immutable content table built via
//!   [`catalog::CatalogBuilder`] and validated once.
//! - [`ledger::Ledger`] -- Integral totals with a fractional carry.
//! - [`unlock::UnlockPredicate`] -- Pure visibility conditions over a
//!   [`unlock::WorldView`].
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`event::Event`] -- Observable changes, drained by the presentation.

pub mod catalog;
pub mod clock;
pub mod completion_log;
pub mod cost;
pub mod economy;
pub mod event;
pub mod fixed;
pub mod id;
pub mod ledger;
pub mod producer;
pub mod query;
pub mod sim;
pub mod standard;
pub mod unlock;
pub mod upgrade;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
