//! Append-only, human-readable log of completed games.
//!
//! Each entry looks like:
//!
//! ```text
//! === 2024-05-01 18:22:03 (tick 5412) ===
//! Food: 120034
//! Sticks: 5120
//! Ants: 212
//! Workers: 40
//!
//! ```
//!
//! The log is write-only. Nothing in the simulation reads it back.

use crate::fixed::Ticks;
use crate::id::{ProducerKind, ResourceKind};
use crate::world::World;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

/// Totals captured at the moment of writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub tick: Ticks,
    pub resources: Vec<(ResourceKind, u64)>,
    pub producers: Vec<(ProducerKind, u64)>,
}

impl CompletionEntry {
    pub fn capture(world: &World) -> Self {
        Self {
            tick: world.tick_count(),
            resources: world.ledger().iter().map(|r| (r.kind, r.total)).collect(),
            producers: world
                .producers()
                .iter()
                .map(|p| (p.kind, p.owned_count))
                .collect(),
        }
    }

    /// Render the entry with the given timestamp, including the trailing
    /// blank line.
    pub fn render(&self, timestamp: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== {timestamp} (tick {}) ===", self.tick);
        for (kind, total) in &self.resources {
            let _ = writeln!(out, "{kind}: {total}");
        }
        for (kind, count) in &self.producers {
            let _ = writeln!(out, "{kind}: {count}");
        }
        out.push('\n');
        out
    }
}

/// A completion log file, created on first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionLog {
    path: PathBuf,
}

impl CompletionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry stamped with the local time.
    pub fn append(&self, entry: &CompletionEntry) -> io::Result<()> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.render(&timestamp).as_bytes())?;
        file.flush()
    }
}
