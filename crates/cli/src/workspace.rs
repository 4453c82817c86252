//! Per-invocation context: repository root, resolved config, and policy.

use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    skillsync_config::{Policy, SkillsyncConfig},
    skillsync_skills::MirrorSet,
    tracing::debug,
};

pub struct Workspace {
    pub repo_root: PathBuf,
    pub config: SkillsyncConfig,
    /// The file the config came from, if any.
    pub config_path: Option<PathBuf>,
    /// `--config` as given, forwarded into the pre-commit hook.
    pub config_flag: Option<PathBuf>,
}

impl Workspace {
    pub async fn load(config_flag: Option<&Path>, repo_flag: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        let repo_root = resolve_repo_root(&cwd, repo_flag).await;
        let config_flag = config_flag.map(|p| absolute(&cwd, p));
        let (config, config_path) =
            skillsync_config::discover_and_load(config_flag.as_deref(), &repo_root)?;
        debug!(
            repo = %repo_root.display(),
            config = ?config_path,
            "workspace resolved"
        );
        Ok(Self {
            repo_root,
            config,
            config_path,
            config_flag,
        })
    }

    pub fn mirrors(&self) -> Vec<MirrorSet> {
        MirrorSet::all_from_config(&self.config, &self.repo_root)
    }

    pub fn policy(&self) -> Result<Policy> {
        Ok(Policy::load(&self.config, &self.repo_root)?)
    }

    /// Resolve a configured path against the repository root.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        SkillsyncConfig::resolve(&self.repo_root, raw)
    }

    pub fn display(&self, path: &Path) -> String {
        skillsync_common::paths::display_relative(&self.repo_root, path)
    }
}

/// `--repo`, else the enclosing git work tree, else the current directory.
pub async fn resolve_repo_root(cwd: &Path, repo_flag: Option<&Path>) -> PathBuf {
    if let Some(repo) = repo_flag {
        return absolute(cwd, repo);
    }
    match skillsync_audit::git::toplevel(cwd).await {
        Ok(top) => top,
        Err(e) => {
            debug!(error = %e, "falling back to current directory as repo root");
            cwd.to_path_buf()
        },
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    skillsync_common::paths::resolve_against(cwd, path)
}
