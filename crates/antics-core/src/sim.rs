//! Simulation configuration and clock state.

use crate::fixed::{Fixed64, Ticks, checked_f64_to_fixed64, f64_to_fixed64};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Completion policy
// ---------------------------------------------------------------------------

/// When the completion snapshot is appended to the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionPolicy {
    /// Write a single entry the first tick every upgrade is purchased.
    #[default]
    Once,
    /// Write an entry on every tick once every upgrade is purchased.
    EveryTick,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for a world. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Scales all production and manual gathering. 1.0 outside of testing.
    pub debug_multiplier: Fixed64,
    /// Factor applied to a producer's cost after each unit bought.
    pub cost_growth: Fixed64,
    /// Base amount added by one manual gather.
    pub gather_amount: u64,
    /// Boost strength is `donor_count / boost_divisor * boost_scale`.
    pub boost_divisor: u64,
    pub boost_scale: Fixed64,
    /// Append-only completion log. `None` disables it.
    pub completion_log: Option<PathBuf>,
    pub completion_policy: CompletionPolicy,
    /// Real-time cadence for drivers. The world itself never sleeps.
    pub tick_interval_ms: u64,
    /// Undrained events kept before the oldest are dropped.
    pub event_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            debug_multiplier: Fixed64::ONE,
            cost_growth: f64_to_fixed64(1.15),
            gather_amount: 1,
            boost_divisor: 20,
            boost_scale: f64_to_fixed64(0.5),
            completion_log: None,
            completion_policy: CompletionPolicy::Once,
            tick_interval_ms: 1000,
            event_capacity: 4096,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("debug multiplier {0} must be finite, non-negative and within Q32.32 range")]
    InvalidMultiplier(f64),
}

impl SimConfig {
    /// Default configuration with production and gathering scaled by `multiplier`.
    pub fn accelerated(multiplier: f64) -> Result<Self, ConfigError> {
        let debug_multiplier = checked_f64_to_fixed64(multiplier)
            .filter(|m| *m >= Fixed64::ZERO)
            .ok_or(ConfigError::InvalidMultiplier(multiplier))?;
        Ok(Self {
            debug_multiplier,
            ..Self::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Clock state
// ---------------------------------------------------------------------------

/// Mutable clock state tracked by the world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimState {
    /// Number of completed ticks.
    pub tick: Ticks,
    /// Set the first tick every upgrade is purchased.
    pub completed: bool,
    /// Set once a completion entry has been attempted.
    pub completion_logged: bool,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = SimConfig::default();
        assert_eq!(config.debug_multiplier, Fixed64::ONE);
        assert_eq!(config.gather_amount, 1);
        assert_eq!(config.boost_divisor, 20);
        assert_eq!(config.boost_scale, f64_to_fixed64(0.5));
        assert_eq!(config.completion_policy, CompletionPolicy::Once);
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.event_capacity, 4096);
        assert!(config.completion_log.is_none());
    }

    #[test]
    fn accelerated_only_changes_debug_multiplier() {
        let config = SimConfig::accelerated(10.0).unwrap();
        assert_eq!(config.debug_multiplier, f64_to_fixed64(10.0));
        assert_eq!(config.cost_growth, SimConfig::default().cost_growth);
    }

    #[test]
    fn accelerated_rejects_unrepresentable_multipliers() {
        for bad in [f64::NAN, f64::INFINITY, -1.0, 1e12] {
            assert!(matches!(
                SimConfig::accelerated(bad),
                Err(ConfigError::InvalidMultiplier(_))
            ));
        }
        assert!(SimConfig::accelerated(0.0).is_ok());
    }

    #[test]
    fn state_starts_at_tick_zero() {
        let state = SimState::new();
        assert_eq!(state.tick, 0);
        assert!(!state.completed);
    }
}
