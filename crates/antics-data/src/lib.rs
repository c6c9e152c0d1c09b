//! Data-driven content for Antics.
//!
//! Loads a [`Catalog`](antics_core::catalog::Catalog) from `resources`,
//! `producers` and `upgrades` files and a
//! [`SimConfig`](antics_core::sim::SimConfig) from a `config` file. Each file
//! may be RON, TOML or JSON. The built-in colony ships under `data/standard/`.

pub mod loader;
pub mod resolve;
pub mod schema;

pub use loader::{DataLoadError, load_catalog, load_sim_config, standard_data_dir};
