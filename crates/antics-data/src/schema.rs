//! Serde data file structs for colony content definitions.
//!
//! These structs define the on-disk format for resources, producers,
//! upgrades and the simulation config. Names are plain strings and rates are
//! `f64`; the resolver turns them into core kinds and fixed-point values.

use antics_core::sim::CompletionPolicy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

// ===========================================================================
// Unlock predicates
// ===========================================================================

/// An unlock condition in a data file.
///
/// RON: `Upgrade("First Queen")`, `All([Producer("Ants", 40), Resource("Land", 10)])`.
/// TOML: `unlock = { Upgrade = "First Queen" }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub enum UnlockData {
    #[default]
    Always,
    Never,
    /// Resource total at least the given amount.
    Resource(String, u64),
    /// At least the given number of producer units owned.
    Producer(String, u64),
    /// The named upgrade has been purchased.
    Upgrade(String),
    All(Vec<UnlockData>),
    Any(Vec<UnlockData>),
}

// ===========================================================================
// Resources
// ===========================================================================

/// A resource definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceData {
    pub name: String,
    #[serde(default)]
    pub starts_visible: bool,
    #[serde(default)]
    pub unlock: UnlockData,
    /// Marks the resource the manual gather action adds to. At most one.
    #[serde(default)]
    pub gather: bool,
}

// ===========================================================================
// Producers
// ===========================================================================

/// A producer definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProducerData {
    pub name: String,
    /// Resource name to amount for the first unit.
    pub cost: BTreeMap<String, u64>,
    /// Resource name to output per unit per tick.
    pub outputs: BTreeMap<String, f64>,
    #[serde(default)]
    pub starting_count: u64,
    #[serde(default)]
    pub starts_visible: bool,
    #[serde(default)]
    pub unlock: UnlockData,
}

// ===========================================================================
// Upgrades
// ===========================================================================

/// An upgrade definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeData {
    pub name: String,
    pub cost: BTreeMap<String, u64>,
    /// Producer name to rate multiplier.
    #[serde(default)]
    pub rate_modifiers: BTreeMap<String, f64>,
    /// Multiplier applied to the manual gather action.
    #[serde(default)]
    pub click_multiplier: Option<f64>,
    #[serde(default)]
    pub unlock: UnlockData,
    #[serde(default)]
    pub boost: Option<BoostData>,
    #[serde(default)]
    pub replace: Option<ReplaceData>,
    #[serde(default)]
    pub display_text: String,
}

/// Sacrifice one producer line to boost another for a while.
#[derive(Debug, Clone, Deserialize)]
pub struct BoostData {
    pub donor: String,
    pub target: String,
    pub duration_ticks: i64,
    #[serde(default)]
    pub retire: Option<String>,
}

/// Retire one producer line in favour of another.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceData {
    pub old: String,
    pub new: String,
    pub divisor: u64,
    #[serde(default)]
    pub retire: Option<String>,
}

// ===========================================================================
// TOML wrappers
// ===========================================================================

/// TOML files hold lists under a top-level key; these name the keys.
pub const RESOURCES_KEY: &str = "resources";
pub const PRODUCERS_KEY: &str = "producers";
pub const UPGRADES_KEY: &str = "upgrades";

// ===========================================================================
// Simulation config
// ===========================================================================

/// Simulation tunables in a data file. Every field is optional; missing
/// fields keep the core defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfigData {
    pub debug_multiplier: Option<f64>,
    pub cost_growth: Option<f64>,
    pub gather_amount: Option<u64>,
    pub boost_divisor: Option<u64>,
    pub boost_scale: Option<f64>,
    pub completion_log: Option<PathBuf>,
    pub completion_policy: Option<CompletionPolicy>,
    pub tick_interval_ms: Option<u64>,
    pub event_capacity: Option<usize>,
}
