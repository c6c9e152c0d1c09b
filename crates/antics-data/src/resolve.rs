//! Resolution of deserialized data into core types.
//!
//! Names become kinds through their `FromStr` impls, `f64` rates become
//! [`Fixed64`], and each definition is registered on a [`CatalogBuilder`].
//! Cross-entity checks (unknown references, multipliers below one) are left
//! to [`CatalogBuilder::build`].

use antics_core::catalog::{CatalogBuilder, ProducerDef, ResourceDef, UpgradeDef};
use antics_core::cost::Cost;
use antics_core::fixed::Fixed64;
use antics_core::id::{ParseKindError, ProducerKind, ResourceKind, UpgradeKind};
use antics_core::sim::SimConfig;
use antics_core::unlock::UnlockPredicate;
use antics_core::upgrade::{BoostSpec, RateTarget, ReplaceSpec};
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use std::path::Path;
use std::str::FromStr;

use crate::loader::DataLoadError;
use crate::schema::*;

// ===========================================================================
// Primitives
// ===========================================================================

/// Parse a kind name, reporting the file on failure.
pub fn resolve_kind<K>(name: &str, file: &Path) -> Result<K, DataLoadError>
where
    K: FromStr<Err = ParseKindError>,
{
    name.parse().map_err(|e: ParseKindError| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: e.name,
        expected_kind: e.expected,
    })
}

/// Record `kind` as seen, returning `DuplicateName` if it already was.
fn check_duplicate<K: Eq + Hash>(
    seen: &mut HashSet<K>,
    kind: K,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if seen.insert(kind) {
        Ok(())
    } else {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    }
}

fn invalid(file: &Path, field: impl Into<String>, detail: impl Into<String>) -> DataLoadError {
    DataLoadError::InvalidValue {
        file: file.to_path_buf(),
        field: field.into(),
        detail: detail.into(),
    }
}

/// Convert a data-file number to fixed point, rejecting NaN and values
/// outside the Q32.32 range.
fn to_fixed(value: f64, field: &str, file: &Path) -> Result<Fixed64, DataLoadError> {
    Fixed64::checked_from_num(value)
        .filter(|_| value.is_finite())
        .ok_or_else(|| invalid(file, field, format!("{value} is not representable")))
}

fn resolve_cost(cost: &BTreeMap<String, u64>, file: &Path) -> Result<Cost, DataLoadError> {
    let mut out = Cost::new();
    for (name, &amount) in cost {
        out.add(resolve_kind::<ResourceKind>(name, file)?, amount);
    }
    Ok(out)
}

/// Resolve an `UnlockData` tree into an `UnlockPredicate`.
pub fn resolve_predicate(data: &UnlockData, file: &Path) -> Result<UnlockPredicate, DataLoadError> {
    Ok(match data {
        UnlockData::Always => UnlockPredicate::Always,
        UnlockData::Never => UnlockPredicate::Never,
        UnlockData::Resource(name, n) => UnlockPredicate::ResourceAtLeast(resolve_kind(name, file)?, *n),
        UnlockData::Producer(name, n) => UnlockPredicate::ProducerAtLeast(resolve_kind(name, file)?, *n),
        UnlockData::Upgrade(name) => UnlockPredicate::UpgradePurchased(resolve_kind(name, file)?),
        UnlockData::All(parts) => UnlockPredicate::All(
            parts
                .iter()
                .map(|p| resolve_predicate(p, file))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        UnlockData::Any(parts) => UnlockPredicate::Any(
            parts
                .iter()
                .map(|p| resolve_predicate(p, file))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    })
}

fn resolve_retire(name: &Option<String>, file: &Path) -> Result<Option<ResourceKind>, DataLoadError> {
    name.as_deref().map(|n| resolve_kind(n, file)).transpose()
}

// ===========================================================================
// Catalog sections
// ===========================================================================

/// Register every resource and pick the gather target.
pub(crate) fn resolve_resources(
    data: &[ResourceData],
    file: &Path,
    builder: &mut CatalogBuilder,
) -> Result<(), DataLoadError> {
    let mut seen = HashSet::new();
    let mut gather: Option<&str> = None;
    for res in data {
        let kind: ResourceKind = resolve_kind(&res.name, file)?;
        check_duplicate(&mut seen, kind, &res.name, file)?;
        if res.gather {
            if let Some(first) = gather {
                return Err(DataLoadError::MultipleGather {
                    file: file.to_path_buf(),
                    first: first.to_string(),
                    second: res.name.clone(),
                });
            }
            gather = Some(&res.name);
            builder.gather_into(kind);
        }
        builder.register_resource(ResourceDef {
            kind,
            starts_visible: res.starts_visible,
            unlock: resolve_predicate(&res.unlock, file)?,
        });
    }
    Ok(())
}

pub(crate) fn resolve_producers(
    data: &[ProducerData],
    file: &Path,
    builder: &mut CatalogBuilder,
) -> Result<(), DataLoadError> {
    let mut seen = HashSet::new();
    for prod in data {
        let kind: ProducerKind = resolve_kind(&prod.name, file)?;
        check_duplicate(&mut seen, kind, &prod.name, file)?;
        let mut outputs = BTreeMap::new();
        for (name, &rate) in &prod.outputs {
            let field = format!("{} output {name}", prod.name);
            outputs.insert(resolve_kind::<ResourceKind>(name, file)?, to_fixed(rate, &field, file)?);
        }
        builder.register_producer(ProducerDef {
            kind,
            cost: resolve_cost(&prod.cost, file)?,
            outputs,
            starting_count: prod.starting_count,
            starts_visible: prod.starts_visible,
            unlock: resolve_predicate(&prod.unlock, file)?,
        });
    }
    Ok(())
}

pub(crate) fn resolve_upgrades(
    data: &[UpgradeData],
    file: &Path,
    builder: &mut CatalogBuilder,
) -> Result<(), DataLoadError> {
    let mut seen = HashSet::new();
    for up in data {
        let kind: UpgradeKind = resolve_kind(&up.name, file)?;
        check_duplicate(&mut seen, kind, &up.name, file)?;

        let mut rate_modifiers = BTreeMap::new();
        for (name, &multiplier) in &up.rate_modifiers {
            let field = format!("{} modifier {name}", up.name);
            rate_modifiers.insert(
                RateTarget::Producer(resolve_kind(name, file)?),
                to_fixed(multiplier, &field, file)?,
            );
        }
        if let Some(click) = up.click_multiplier {
            let field = format!("{} click_multiplier", up.name);
            rate_modifiers.insert(RateTarget::Click, to_fixed(click, &field, file)?);
        }

        let boost = match &up.boost {
            Some(b) => Some(BoostSpec {
                donor: resolve_kind(&b.donor, file)?,
                target: resolve_kind(&b.target, file)?,
                duration_ticks: b.duration_ticks,
                retire: resolve_retire(&b.retire, file)?,
            }),
            None => None,
        };
        let replace = match &up.replace {
            Some(r) => Some(ReplaceSpec {
                old: resolve_kind(&r.old, file)?,
                new: resolve_kind(&r.new, file)?,
                divisor: r.divisor,
                retire: resolve_retire(&r.retire, file)?,
            }),
            None => None,
        };

        builder.register_upgrade(UpgradeDef {
            kind,
            cost: resolve_cost(&up.cost, file)?,
            rate_modifiers,
            unlock: resolve_predicate(&up.unlock, file)?,
            boost,
            replace,
            display_text: up.display_text.clone(),
        });
    }
    Ok(())
}

// ===========================================================================
// Simulation config
// ===========================================================================

/// Overlay a config file on the core defaults and check the ranges the
/// simulation relies on.
pub(crate) fn resolve_sim_config(data: &SimConfigData, file: &Path) -> Result<SimConfig, DataLoadError> {
    let mut config = SimConfig::default();

    if let Some(v) = data.debug_multiplier {
        if v < 0.0 {
            return Err(invalid(file, "debug_multiplier", "must not be negative"));
        }
        config.debug_multiplier = to_fixed(v, "debug_multiplier", file)?;
    }
    if let Some(v) = data.cost_growth {
        if v < 1.0 {
            return Err(invalid(file, "cost_growth", "must be at least 1"));
        }
        config.cost_growth = to_fixed(v, "cost_growth", file)?;
    }
    if let Some(v) = data.gather_amount {
        config.gather_amount = v;
    }
    if let Some(v) = data.boost_divisor {
        if v == 0 {
            return Err(invalid(file, "boost_divisor", "must be positive"));
        }
        config.boost_divisor = v;
    }
    if let Some(v) = data.boost_scale {
        if v < 0.0 {
            return Err(invalid(file, "boost_scale", "must not be negative"));
        }
        config.boost_scale = to_fixed(v, "boost_scale", file)?;
    }
    if let Some(path) = &data.completion_log {
        config.completion_log = Some(path.clone());
    }
    if let Some(policy) = data.completion_policy {
        config.completion_policy = policy;
    }
    if let Some(ms) = data.tick_interval_ms {
        config.tick_interval_ms = ms;
    }
    if let Some(capacity) = data.event_capacity {
        if capacity == 0 {
            return Err(invalid(file, "event_capacity", "must be positive"));
        }
        config.event_capacity = capacity;
    }

    Ok(config)
}
