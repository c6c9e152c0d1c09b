//! The shipped data directory must describe exactly the built-in colony.

use antics_core::catalog::Catalog;
use antics_core::id::*;
use antics_core::sim::{CompletionPolicy, SimConfig};
use antics_core::world::World;
use antics_data::{load_catalog, load_sim_config, standard_data_dir};

#[test]
fn shipped_catalog_matches_builtin() {
    let loaded = load_catalog(&standard_data_dir()).unwrap();
    let builtin = Catalog::standard().unwrap();
    assert_eq!(loaded, builtin);
}

#[test]
fn shipped_config_matches_defaults() {
    let config = load_sim_config(&standard_data_dir().join("config.toml")).unwrap();
    assert_eq!(config, SimConfig::default());
    assert_eq!(config.completion_policy, CompletionPolicy::Once);
}

#[test]
fn loaded_catalog_drives_a_world() {
    let catalog = load_catalog(&standard_data_dir()).unwrap();
    let mut world = World::new(&catalog, SimConfig::default());
    for _ in 0..10 {
        world.gather().unwrap();
    }
    assert_eq!(world.purchase_producer(ProducerKind::Ants, 1).unwrap().bought, 1);
    world.run(4);
    assert_eq!(world.resource_total(ResourceKind::Food).unwrap(), 2);
    assert!(world.get_visibility(ResourceKind::Food).unwrap());
    assert!(!world.get_visibility(ResourceKind::Sticks).unwrap());
}
