//! Cross-crate end-to-end runs: load the shipped colony data, play it with a
//! greedy auto-buyer from the first Ant to the last upgrade, and check the
//! completion log.

use std::fs;
use std::path::PathBuf;

use antics_core::event::{Event, EventKind};
use antics_core::fixed::f64_to_fixed64;
use antics_core::id::*;
use antics_core::sim::{CompletionPolicy, SimConfig};
use antics_core::world::World;
use antics_data::{load_catalog, load_sim_config, standard_data_dir};

/// Upper bound on ticks for an accelerated run. Greedy play at speed 10
/// finishes in well under 2,000.
const TICK_LIMIT: u64 = 20_000;

fn temp_log(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "antics_it_{name}_{}.log",
        std::process::id()
    ));
    let _ = fs::remove_file(&path);
    path
}

fn standard_world(speed: f64, log: PathBuf, policy: CompletionPolicy) -> World {
    let dir = standard_data_dir();
    let catalog = load_catalog(&dir).unwrap();
    let mut config: SimConfig = load_sim_config(&dir.join("config.toml")).unwrap();
    config.debug_multiplier = f64_to_fixed64(speed);
    config.completion_log = Some(log);
    config.completion_policy = policy;
    World::new(&catalog, config)
}

/// One driver step: gather, buy every visible affordable upgrade, then
/// buy-max every visible producer.
fn greedy_step(world: &mut World) {
    world.gather().unwrap();
    for &kind in UpgradeKind::ALL {
        if world.get_visibility(kind).unwrap() && world.can_afford_upgrade(kind).unwrap() {
            world.purchase_upgrade(kind).unwrap();
        }
    }
    for &kind in ProducerKind::ALL {
        if world.get_visibility(kind).unwrap() {
            world.purchase_producer(kind, 0).unwrap();
        }
    }
}

/// Play until complete, returning every event emitted along the way.
fn play_to_completion(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    while !world.is_complete() {
        assert!(world.tick_count() < TICK_LIMIT, "colony never completed");
        greedy_step(world);
        world.tick();
        events.extend(world.drain_events());
    }
    events
}

fn log_headers(log: &str) -> Vec<&str> {
    log.lines().filter(|l| l.starts_with("=== ")).collect()
}

#[test]
fn greedy_colony_completes_and_logs_once() {
    let log = temp_log("once");
    let mut world = standard_world(10.0, log.clone(), CompletionPolicy::Once);

    let events = play_to_completion(&mut world);
    let done_at = world.tick_count();

    for &kind in UpgradeKind::ALL {
        assert!(world.upgrade_purchased(kind).unwrap(), "{kind} not purchased");
    }
    let completed: Vec<_> = events
        .iter()
        .filter(|e| e.kind() == EventKind::GameCompleted)
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].tick(), done_at);

    // Later ticks neither re-fire the event nor append to the log.
    world.run(10);
    assert!(world.drain_events().iter().all(|e| e.kind() != EventKind::GameCompleted));

    let text = fs::read_to_string(&log).unwrap();
    let headers = log_headers(&text);
    assert_eq!(headers.len(), 1);
    assert!(headers[0].ends_with(&format!("(tick {done_at}) ===")));
    assert!(text.contains("\nFood: "));
    assert!(text.contains("\nEngineers: "));
    assert!(text.ends_with("\n\n"));

    let _ = fs::remove_file(&log);
}

#[test]
fn sacrifices_and_replacement_happen_along_the_way() {
    let log = temp_log("sacrifice");
    let mut world = standard_world(10.0, log.clone(), CompletionPolicy::Once);
    let mut events = play_to_completion(&mut world);
    // Outlast any boost still running at completion.
    world.run(40);
    events.extend(world.drain_events());

    let count =|kind: EventKind| events.iter().filter(|e| e.kind() == kind).count();
    assert_eq!(count(EventKind::ProducerReplaced), 1);
    assert_eq!(count(EventKind::BoostActivated), 1);
    assert_eq!(count(EventKind::BoostExpired), 1);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::ResourceRetired { resource: ResourceKind::Land, .. }
    )));

    // Retired lines stay hidden and unbuyable; their owners keep their counts.
    for retired in [ProducerKind::Workers, ProducerKind::Soldiers] {
        assert!(!world.get_visibility(retired).unwrap());
        assert!(world.producer_count(retired).unwrap() > 0);
        assert_eq!(world.purchase_producer(retired, 1).unwrap().bought, 0);
    }
    assert!(!world.get_visibility(ResourceKind::Land).unwrap());
    for pair in events.windows(2) {
        assert!(pair[0].tick() <= pair[1].tick(), "events out of order");
    }

    let _ = fs::remove_file(&log);
}

#[test]
fn every_tick_policy_appends_each_tick_after_completion() {
    let log = temp_log("every_tick");
    let mut world = standard_world(50.0, log.clone(), CompletionPolicy::EveryTick);

    play_to_completion(&mut world);
    world.run(4);

    let text = fs::read_to_string(&log).unwrap();
    assert_eq!(log_headers(&text).len(), 5);

    let _ = fs::remove_file(&log);
}

#[test]
fn identical_runs_are_identical() {
    let a_log = temp_log("det_a");
    let b_log = temp_log("det_b");
    let mut a = standard_world(10.0, a_log.clone(), CompletionPolicy::Once);
    let mut b = standard_world(10.0, b_log.clone(), CompletionPolicy::Once);

    let a_events = play_to_completion(&mut a);
    let b_events = play_to_completion(&mut b);

    assert_eq!(a.tick_count(), b.tick_count());
    assert_eq!(a_events, b_events);
    assert_eq!(a.snapshot(), b.snapshot());

    let _ = fs::remove_file(&a_log);
    let _ = fs::remove_file(&b_log);
}
