//! Closed kind enums for resources, producers and upgrades, with display
//! names and forgiving name parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a name does not match any known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {expected} name: {name:?}")]
pub struct ParseKindError {
    pub expected: &'static str,
    pub name: String,
}

/// Normalize a display or data-file name for lookup: `pack-frame`,
/// `pack_frame` and `Pack Frame` all compare equal.
fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Declares a closed kind enum with display names, an `ALL` table and a
/// case-insensitive `FromStr`.
macro_rules! kind_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $display:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every kind, in catalog order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable name shown to the player.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $display),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ParseKindError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|k| normalize(k.name()) == wanted)
                    .ok_or_else(|| ParseKindError {
                        expected: $label,
                        name: s.to_string(),
                    })
            }
        }
    };
}

kind_enum! {
    /// A resource the player accumulates.
    ResourceKind, "resource" {
        Food => "Food",
        Sticks => "Sticks",
        Stones => "Stones",
        Land => "Land",
        Metal => "Metal",
        Energy => "Energy",
        Lumber => "Lumber",
    }
}

kind_enum! {
    /// A purchasable unit that produces resources every tick.
    ProducerKind, "producer" {
        Ants => "Ants",
        Workers => "Workers",
        Haulers => "Haulers",
        Soldiers => "Soldiers",
        Miners => "Miners",
        Engineers => "Engineers",
        Lumberjacks => "Lumberjacks",
    }
}

kind_enum! {
    /// A one-time purchase that modifies production.
    UpgradeKind, "upgrade" {
        FirstQueen => "First Queen",
        SugarWater => "Sugar Water",
        Stilts => "Stilts",
        PackFrame => "Pack Frame",
        Wheel => "Wheel",
        Club => "Club",
        Farming => "Farming",
        Forest => "Forest",
        Quarry => "Quarry",
        Outpost => "Outpost",
        Mining => "Mining",
        MetalTools => "Metal Tools",
        MetalWeapons => "Metal Weapons",
        IndustrialRevolution => "Industrial Revolution",
        IndustrialFarming => "Industrial Farming",
        TreeFarming => "Tree Farming",
    }
}

/// Any catalog entity. Used by generic queries such as visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Resource(ResourceKind),
    Producer(ProducerKind),
    Upgrade(UpgradeKind),
}

impl From<ResourceKind> for EntityKind {
    fn from(kind: ResourceKind) -> Self {
        EntityKind::Resource(kind)
    }
}

impl From<ProducerKind> for EntityKind {
    fn from(kind: ProducerKind) -> Self {
        EntityKind::Producer(kind)
    }
}

impl From<UpgradeKind> for EntityKind {
    fn from(kind: UpgradeKind) -> Self {
        EntityKind::Upgrade(kind)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Resource(k) => fmt::Display::fmt(k, f),
            EntityKind::Producer(k) => fmt::Display::fmt(k, f),
            EntityKind::Upgrade(k) => fmt::Display::fmt(k, f),
        }
    }
}
