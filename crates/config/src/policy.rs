//! Per-machine policy lists: exclusion names and audit blocklist terms.
//!
//! Both files share one format: one entry per line, `#` comments and blank
//! lines ignored, surrounding whitespace trimmed. A missing file is an empty
//! list; skillsync never creates these files.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{Context, Result},
    schema::SkillsyncConfig,
};

/// Ordered, de-duplicated list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl NameList {
    /// Parse list text. Later duplicates are dropped.
    pub fn parse(text: &str) -> Self {
        let mut list = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            list.push(line);
        }
        list
    }

    /// Read a list file. Missing files yield an empty list.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "policy list not present");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read policy list {}", path.display()))?;
        let list = Self::parse(&text);
        debug!(path = %path.display(), entries = list.len(), "loaded policy list");
        Ok(list)
    }

    /// Union of several list files, in the given order.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut list = Self::default();
        for path in paths {
            list.extend(&Self::load(path.as_ref())?);
        }
        Ok(list)
    }

    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.index.insert(name.clone()) {
            self.entries.push(name);
        }
    }

    pub fn extend(&mut self, other: &NameList) {
        for name in &other.entries {
            self.push(name.clone());
        }
    }

    /// Exact name equality; never a substring or pattern match.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NameList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::default();
        for name in iter {
            list.push(name);
        }
        list
    }
}

/// Policy loaded once per invocation and handed to the engines.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    /// Names excluded from `pull` and tagged EXCLUDED by discovery.
    pub exclusions: NameList,
    /// Literal terms only the audit cares about.
    pub blocklist: NameList,
}

impl Policy {
    pub fn load(config: &SkillsyncConfig, repo_root: &Path) -> Result<Self> {
        let exclude_paths = Self::resolve_all(repo_root, &config.policy.exclude_files);
        let blocklist_paths = Self::resolve_all(repo_root, &config.policy.blocklist_files);
        Ok(Self {
            exclusions: NameList::load_all(&exclude_paths)?,
            blocklist: NameList::load_all(&blocklist_paths)?,
        })
    }

    /// Every term the audit forbids: exclusion names plus blocklist terms.
    pub fn audit_terms(&self) -> NameList {
        let mut terms = self.exclusions.clone();
        terms.extend(&self.blocklist);
        terms
    }

    fn resolve_all(repo_root: &Path, raw: &[String]) -> Vec<PathBuf> {
        raw.iter()
            .map(|p| SkillsyncConfig::resolve(repo_root, p))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let list = NameList::parse("# machine-local\nfoo\n\n  bar  \n#baz\nfoo\n");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["foo", "bar"]);
    }

    #[test]
    fn contains_is_exact() {
        let list = NameList::parse("bar\n");
        assert!(list.contains("bar"));
        assert!(!list.contains("bar-tool"));
        assert!(!list.contains("ba"));
        assert!(!list.contains("BAR"));
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let list = NameList::load(&tmp.path().join("absent")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn policy_loads_relative_to_repo() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".sync-exclude"), "private-skill\n").unwrap();
        std::fs::write(tmp.path().join(".audit-blocklist"), "acme-internal\nprivate-skill\n")
            .unwrap();

        let policy = Policy::load(&SkillsyncConfig::default(), tmp.path()).unwrap();
        assert!(policy.exclusions.contains("private-skill"));
        assert!(!policy.exclusions.contains("acme-internal"));

        let terms = policy.audit_terms();
        assert_eq!(terms.iter().collect::<Vec<_>>(), vec![
            "private-skill",
            "acme-internal"
        ]);
    }
}
