//! Headless driver: plays the standard colony with a greedy auto-buyer.
//!
//! Every tick it buys each visible, affordable upgrade, then as many units
//! of each visible producer as it can, and logs unlocks and milestones.
//! Stops once every upgrade is purchased or the tick limit is reached.
//!
//! Run with:
//! `RUST_LOG=info cargo run -p antics-core --example headless -- --interval-ms 0 --speed 10`
//!
//! See `--help` for the flags.

use antics_core::catalog::Catalog;
use antics_core::event::Event;
use antics_core::id::*;
use antics_core::sim::SimConfig;
use antics_core::world::World;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Play the standard colony with a greedy auto-buyer")]
struct Args {
    /// Stop after this many ticks
    #[arg(long, default_value_t = 100_000)]
    ticks: u64,

    /// Real-time delay between ticks (default from config)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Debug multiplier for production and gathering
    #[arg(long)]
    speed: Option<f64>,

    /// Append the completion snapshot to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn auto_buy(world: &mut World) {
    for &kind in UpgradeKind::ALL {
        if world.get_visibility(kind).unwrap_or(false)
            && world.can_afford_upgrade(kind).unwrap_or(false)
        {
            if let Ok(outcome) = world.purchase_upgrade(kind) {
                if outcome.is_purchased() {
                    tracing::info!(upgrade = %kind, tick = world.tick_count(), "bought upgrade");
                }
            }
        }
    }
    for &kind in ProducerKind::ALL {
        if world.get_visibility(kind).unwrap_or(false) {
            let _ = world.purchase_producer(kind, 0);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match args.speed.map(SimConfig::accelerated) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            eprintln!("error: --speed: {err}");
            std::process::exit(2);
        }
        None => SimConfig::default(),
    };
    config.completion_log = args.log;
    if let Some(ms) = args.interval_ms {
        config.tick_interval_ms = ms;
    }
    let interval = Duration::from_millis(config.tick_interval_ms);

    let catalog = match Catalog::standard() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let mut world = World::new(&catalog, config);

    while world.tick_count() < args.ticks && !world.is_complete() {
        let _ = world.gather();
        auto_buy(&mut world);
        world.tick();

        for event in world.drain_events() {
            match event {
                Event::Unlocked { entity, tick } => tracing::info!(%entity, tick, "unlocked"),
                Event::ProducerReplaced { old, new, transferred, tick } => {
                    tracing::info!(%old, %new, transferred, tick, "replaced")
                }
                Event::GameCompleted { tick } => tracing::info!(tick, "colony complete"),
                _ => {}
            }
        }

        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    println!("Finished after {} ticks", world.tick_count());
    for resource in world.snapshot().resources {
        if resource.total > 0 {
            println!("  {:<8} {}", resource.kind, resource.total);
        }
    }
    for producer in world.snapshot().producers {
        if producer.owned > 0 {
            println!("  {:<12} {:>5}  {}", producer.kind, producer.owned, producer.rate_text);
        }
    }
}
