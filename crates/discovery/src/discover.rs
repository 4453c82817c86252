//! Walk manifest entries and inventory each project.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::Result,
    inventory::{ProjectInventory, TargetParser, inventory},
    manifest::ManifestEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The path does not exist or is not a directory.
    Missing,
    /// The path is the repository being synced.
    SelfReference,
    /// Listed earlier under another spelling.
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct SkippedProject {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Every existing project, including those with nothing in them.
    pub projects: Vec<ProjectInventory>,
    pub skipped: Vec<SkippedProject>,
}

impl Discovery {
    /// Projects with at least one artifact.
    pub fn non_empty(&self) -> impl Iterator<Item = &ProjectInventory> {
        self.projects.iter().filter(|p| !p.is_empty())
    }

    pub fn missing(&self) -> impl Iterator<Item = &Path> {
        self.skipped
            .iter()
            .filter(|s| s.reason == SkipReason::Missing)
            .map(|s| s.path.as_path())
    }
}

/// Inventory every manifest entry except missing paths and the repository
/// itself. Both are recorded in [`Discovery::skipped`] and the scan goes on.
pub fn discover(entries: &[ManifestEntry], repo_root: &Path) -> Result<Discovery> {
    let parser = TargetParser::new()?;
    let repo = canonical(repo_root);
    let mut seen = HashSet::new();
    let mut out = Discovery::default();

    for entry in entries {
        let path = entry.path.clone();
        if !path.is_dir() {
            debug!(path = %path.display(), "project path missing");
            out.skipped.push(SkippedProject {
                path,
                reason: SkipReason::Missing,
            });
            continue;
        }
        let resolved = canonical(&path);
        let reason = if resolved == repo {
            Some(SkipReason::SelfReference)
        } else if !seen.insert(resolved) {
            Some(SkipReason::Duplicate)
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(path = %path.display(), ?reason, "skipping project");
            out.skipped.push(SkippedProject { path, reason });
            continue;
        }
        out.projects.push(inventory(&path, &parser)?);
    }
    Ok(out)
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
