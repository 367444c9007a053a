//! One statistics pass
//!
//! collect -> resolve -> aggregate -> format. Every pass starts from
//! scratch; nothing is carried over from the previous one.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::display::Display;
use crate::error::StatsError;
use crate::format;
use crate::git::{self, Resolver};
use crate::stats::LineStats;

/// Everything a pass needs to know about where it runs
#[derive(Debug, Clone)]
pub struct Workspace {
    root: Option<PathBuf>,
    icon: String,
}

impl Workspace {
    pub fn new(root: Option<PathBuf>, icon: impl Into<String>) -> Self {
        Self {
            root,
            icon: icon.into(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Compute stats for this workspace
    pub fn compute(&self) -> Result<LineStats, StatsError> {
        compute(self.root())
    }

    /// Compute and format; never fails, errors become display variants
    pub fn render_pass(&self) -> Display {
        let started = Instant::now();
        let outcome = self.compute();

        match &outcome {
            Ok(stats) => tracing::debug!(
                event = "pipeline.pass_completed",
                staged = stats.staged_files().len(),
                changes = stats.changes_files().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
            ),
            Err(e) => tracing::warn!(event = "pipeline.pass_failed", error = %e),
        }

        format::render(&outcome, &self.icon)
    }
}

/// Run collection, resolution and aggregation for a workspace root
pub fn compute(root: Option<&Path>) -> Result<LineStats, StatsError> {
    let repo = git::open_repository(root)?;
    let raw = git::collect(&repo)?;
    let resolved = Resolver::new(&repo)?.resolve(&raw);
    Ok(LineStats::new(resolved.staged, resolved.changes))
}
