//! Config schema types (policy files, mirror sets, audit scope, discovery).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use skillsync_common::paths::{expand_tilde, resolve_against};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsyncConfig {
    pub policy: PolicyConfig,
    pub discovery: DiscoveryConfig,
    pub audit: AuditConfig,
    /// Mirror sets, each a repo directory plus installed copies.
    pub mirrors: Vec<MirrorConfig>,
}

impl Default for SkillsyncConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            discovery: DiscoveryConfig::default(),
            audit: AuditConfig::default(),
            mirrors: vec![
                MirrorConfig {
                    name: "skills".into(),
                    repo: "skills".into(),
                    installed: vec![
                        InstalledRootConfig::new("claude", "~/.claude/skills"),
                        InstalledRootConfig::new("codex", "~/.codex/skills"),
                    ],
                },
                MirrorConfig {
                    name: "commands".into(),
                    repo: "commands".into(),
                    installed: vec![InstalledRootConfig::new("claude", "~/.claude/commands")],
                },
            ],
        }
    }
}

impl SkillsyncConfig {
    /// Resolve a configured path: `~/` expands to home, relative paths are
    /// taken from the repository root.
    pub fn resolve(repo_root: &Path, raw: &str) -> PathBuf {
        resolve_against(repo_root, &expand_tilde(raw))
    }

    /// Directories the audit scans when no explicit `audit.paths` are set.
    pub fn audit_paths(&self, repo_root: &Path) -> Vec<PathBuf> {
        if self.audit.paths.is_empty() {
            self.mirrors
                .iter()
                .map(|m| Self::resolve(repo_root, &m.repo))
                .collect()
        } else {
            self.audit
                .paths
                .iter()
                .map(|p| Self::resolve(repo_root, p))
                .collect()
        }
    }
}

/// Per-machine policy files. All are optional on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Names excluded from sync. Also blocklist terms for the audit.
    pub exclude_files: Vec<String>,
    /// Literal terms forbidden in committed content.
    pub blocklist_files: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            exclude_files: vec![".sync-exclude".into()],
            blocklist_files: vec![".audit-blocklist".into()],
        }
    }
}

/// Cross-project discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// `path|description` manifest of projects to scan.
    pub manifest: String,
    /// Default output path for `scan report`.
    pub report: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifest: ".scan-projects".into(),
            report: "skill-scan-report.md".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Paths to audit. Empty means every mirror's repo directory.
    pub paths: Vec<String>,
}

/// One mirror set: a repo directory and its installed copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub name: String,
    /// Repo-store directory, relative to the repository root.
    pub repo: String,
    /// Installed roots in pull precedence order (first wins).
    #[serde(default)]
    pub installed: Vec<InstalledRootConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledRootConfig {
    pub name: String,
    pub path: String,
}

impl InstalledRootConfig {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}
