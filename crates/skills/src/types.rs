use std::{
    collections::HashSet,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use {
    skillsync_config::{MirrorConfig, SkillsyncConfig},
    tracing::{debug, warn},
};

use crate::{
    error::{Context, Result},
    tree::{compare_trees, copy_dir_recursive, files_equal},
};

// ── Skill units ─────────────────────────────────────────────────────────────

/// One synchronizable skill. Content is opaque; only identity and bytes matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillUnit {
    /// A directory with an entry document and optional helpers.
    /// Identity is the directory name.
    Directory { name: String, path: PathBuf },
    /// A single document. Identity is the file name without extension.
    File { name: String, path: PathBuf },
}

impl SkillUnit {
    /// Classify a root entry. Hidden entries are never skills.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if file_name.starts_with('.') {
            return None;
        }
        if path.is_dir() {
            Some(Self::Directory {
                name: file_name.to_string(),
                path: path.to_path_buf(),
            })
        } else if path.is_file() {
            let name = path.file_stem()?.to_str()?.to_string();
            Some(Self::File {
                name,
                path: path.to_path_buf(),
            })
        } else {
            None
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } => path,
        }
    }

    /// The on-disk entry name (`foo/` or `foo.md`).
    pub fn file_name(&self) -> &OsStr {
        self.path().file_name().unwrap_or_else(|| OsStr::new(self.name()))
    }

    /// Byte-for-byte equality, recursive for directories. Units of different
    /// kinds, or file units with different extensions, are never equal.
    pub fn content_equals(&self, other: &SkillUnit) -> Result<bool> {
        match (self, other) {
            (Self::Directory { path: a, .. }, Self::Directory { path: b, .. }) => {
                Ok(compare_trees(a, b)?.is_empty())
            },
            (Self::File { path: a, .. }, Self::File { path: b, .. }) => {
                Ok(a.file_name() == b.file_name() && files_equal(a, b)?)
            },
            _ => Ok(false),
        }
    }

    /// Copy into `root`, fully replacing whatever unit of the same name is
    /// there. Directories are deleted first so no stale files survive.
    pub fn copy_to(&self, root: &MirrorRoot) -> Result<SkillUnit> {
        std::fs::create_dir_all(&root.path)
            .with_context(|| format!("failed to create {}", root.path.display()))?;
        self.remove_from(root)?;

        let target = root.path.join(self.file_name());
        match self {
            Self::Directory { path, .. } => copy_dir_recursive(path, &target),
            Self::File { path, .. } => std::fs::copy(path, &target).map(|_| ()).map_err(Into::into),
        }
        .with_context(|| {
            format!(
                "failed to copy skill '{}' to {}",
                self.name(),
                target.display()
            )
        })?;

        debug!(skill = %self.name(), target = %target.display(), "copied skill");
        Ok(match self {
            Self::Directory { name, .. } => Self::Directory {
                name: name.clone(),
                path: target,
            },
            Self::File { name, .. } => Self::File {
                name: name.clone(),
                path: target,
            },
        })
    }

    /// Delete the unit with this identity from `root`. Returns whether
    /// anything was removed.
    pub fn remove_from(&self, root: &MirrorRoot) -> Result<bool> {
        let Some(existing) = root.find(self.name())? else {
            return Ok(false);
        };
        existing.delete()?;
        Ok(true)
    }

    fn delete(&self) -> Result<()> {
        match self {
            Self::Directory { path, .. } => std::fs::remove_dir_all(path),
            Self::File { path, .. } => std::fs::remove_file(path),
        }
        .with_context(|| format!("failed to remove {}", self.path().display()))?;
        debug!(skill = %self.name(), path = %self.path().display(), "removed skill");
        Ok(())
    }
}

// ── Mirror roots ────────────────────────────────────────────────────────────

/// A named directory holding one copy of a skill collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRoot {
    pub name: String,
    pub path: PathBuf,
}

impl MirrorRoot {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// All skills in this root, sorted by on-disk name. A missing directory
    /// holds zero skills. If two entries share an identity the first wins.
    pub fn skills(&self) -> Result<Vec<SkillUnit>> {
        if !self.path.is_dir() {
            debug!(root = %self.name, path = %self.path.display(), "mirror root missing");
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.path)
            .with_context(|| format!("failed to list {}", self.path.display()))?
        {
            let entry =
                entry.with_context(|| format!("failed to list {}", self.path.display()))?;
            entries.push(entry.path());
        }
        entries.sort();

        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        for path in entries {
            let Some(unit) = SkillUnit::from_path(&path) else {
                continue;
            };
            if !seen.insert(unit.name().to_string()) {
                warn!(
                    root = %self.name,
                    skill = %unit.name(),
                    path = %path.display(),
                    "duplicate skill name in root, ignoring"
                );
                continue;
            }
            skills.push(unit);
        }
        Ok(skills)
    }

    pub fn find(&self, name: &str) -> Result<Option<SkillUnit>> {
        Ok(self.skills()?.into_iter().find(|s| s.name() == name))
    }
}

// ── Mirror sets ─────────────────────────────────────────────────────────────

/// Name used for the repo-store root in reports.
pub const REPO_ROOT_NAME: &str = "repo";

/// One logical collection: the repo store plus installed copies in pull
/// precedence order.
#[derive(Debug, Clone)]
pub struct MirrorSet {
    pub name: String,
    pub repo: MirrorRoot,
    pub installed: Vec<MirrorRoot>,
}

impl MirrorSet {
    pub fn from_config(cfg: &MirrorConfig, repo_root: &Path) -> Self {
        Self {
            name: cfg.name.clone(),
            repo: MirrorRoot::new(
                REPO_ROOT_NAME,
                SkillsyncConfig::resolve(repo_root, &cfg.repo),
            ),
            installed: cfg
                .installed
                .iter()
                .map(|r| MirrorRoot::new(&r.name, SkillsyncConfig::resolve(repo_root, &r.path)))
                .collect(),
        }
    }

    pub fn all_from_config(cfg: &SkillsyncConfig, repo_root: &Path) -> Vec<Self> {
        cfg.mirrors
            .iter()
            .map(|m| Self::from_config(m, repo_root))
            .collect()
    }

    /// Repo store first, then installed roots in precedence order.
    pub fn roots(&self) -> impl Iterator<Item = &MirrorRoot> {
        std::iter::once(&self.repo).chain(self.installed.iter())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn classifies_directory_and_file_skills() {
        let tmp = tempfile::tempdir().unwrap();
        let root = MirrorRoot::new("repo", tmp.path());
        write(&tmp.path().join("writer/SKILL.md"), "x");
        write(&tmp.path().join("review.md"), "y");
        write(&tmp.path().join(".DS_Store"), "z");

        let skills = root.skills().unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].name(), "review");
        assert!(matches!(skills[0], SkillUnit::File { .. }));
        assert_eq!(skills[1].name(), "writer");
        assert!(matches!(skills[1], SkillUnit::Directory { .. }));
    }

    #[test]
    fn missing_root_has_no_skills() {
        let root = MirrorRoot::new("gone", "/nonexistent/skillsync/root");
        assert!(root.skills().unwrap().is_empty());
    }

    #[test]
    fn duplicate_identity_keeps_first_sorted_entry() {
        let tmp = tempfile::tempdir().unwrap();
        write(&tmp.path().join("foo.md"), "file");
        write(&tmp.path().join("foo/SKILL.md"), "dir");

        let skills = MirrorRoot::new("r", tmp.path()).skills().unwrap();
        assert_eq!(skills.len(), 1);
        // "foo" sorts before "foo.md".
        assert!(matches!(skills[0], SkillUnit::Directory { .. }));
    }

    #[test]
    fn copy_replaces_stale_directory_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let src_root = MirrorRoot::new("a", tmp.path().join("a"));
        let dst_root = MirrorRoot::new("b", tmp.path().join("b"));
        write(&src_root.path.join("foo/SKILL.md"), "new");
        write(&dst_root.path.join("foo/SKILL.md"), "old");
        write(&dst_root.path.join("foo/stale.txt"), "leftover");

        let src = src_root.find("foo").unwrap().unwrap();
        let copied = src.copy_to(&dst_root).unwrap();

        assert!(copied.content_equals(&src).unwrap());
        assert!(!dst_root.path.join("foo/stale.txt").exists());
    }

    #[test]
    fn copy_file_skill_replaces_other_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let src_root = MirrorRoot::new("a", tmp.path().join("a"));
        let dst_root = MirrorRoot::new("b", tmp.path().join("b"));
        write(&src_root.path.join("plan.md"), "markdown");
        write(&dst_root.path.join("plan.txt"), "text");

        src_root
            .find("plan")
            .unwrap()
            .unwrap()
            .copy_to(&dst_root)
            .unwrap();

        assert!(dst_root.path.join("plan.md").is_file());
        assert!(!dst_root.path.join("plan.txt").exists());
    }

    #[test]
    fn file_units_with_different_extensions_are_not_equal() {
        let tmp = tempfile::tempdir().unwrap();
        write(&tmp.path().join("a/plan.md"), "same");
        write(&tmp.path().join("b/plan.txt"), "same");
        let a = SkillUnit::from_path(&tmp.path().join("a/plan.md")).unwrap();
        let b = SkillUnit::from_path(&tmp.path().join("b/plan.txt")).unwrap();
        assert!(!a.content_equals(&b).unwrap());
    }

    #[test]
    fn remove_from_missing_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        write(&tmp.path().join("a/foo.md"), "x");
        let unit = SkillUnit::from_path(&tmp.path().join("a/foo.md")).unwrap();
        let other = MirrorRoot::new("b", tmp.path().join("b"));
        assert!(!unit.remove_from(&other).unwrap());
    }

    #[test]
    fn mirror_set_resolves_paths() {
        let cfg = SkillsyncConfig::default();
        let sets = MirrorSet::all_from_config(&cfg, Path::new("/repo"));
        assert_eq!(sets[0].repo.path, PathBuf::from("/repo/skills"));
        assert_eq!(sets[0].roots().count(), 3);
        assert_eq!(sets[1].installed[0].name, "claude");
    }
}
