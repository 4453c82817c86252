//! Read-only comparison of the repo store against installed roots.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use similar::TextDiff;

use crate::{
    error::Result,
    tree::{EntryChange, compare_trees, files_equal},
    types::{MirrorSet, SkillUnit},
};

#[derive(Debug, Clone)]
pub enum DeltaKind {
    OnlyInRepo,
    OnlyInstalled,
    /// One side is a file and the other a directory.
    ShapeChanged,
    Binary,
    /// Unified diff, repo on the left.
    Text(String),
}

/// One differing file inside a modified skill.
#[derive(Debug, Clone)]
pub struct FileDelta {
    pub relative: PathBuf,
    pub kind: DeltaKind,
}

#[derive(Debug, Clone)]
pub enum DiffStatus {
    Unchanged,
    Modified(Vec<FileDelta>),
    /// Present in the repo, missing from this installed root.
    RepoOnly,
    /// Present in this installed root, missing from the repo.
    InstalledOnly,
}

#[derive(Debug, Clone)]
pub struct DiffEntry {
    pub mirror: String,
    pub name: String,
    pub root: String,
    pub status: DiffStatus,
}

#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    pub entries: Vec<DiffEntry>,
}

impl DiffReport {
    /// Entries that are not [`DiffStatus::Unchanged`].
    pub fn differences(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| !matches!(e.status, DiffStatus::Unchanged))
    }

    pub fn is_clean(&self) -> bool {
        self.differences().next().is_none()
    }
}

/// Compare every repo skill against every installed root, then list names
/// only present in an installed root.
pub fn diff(mirrors: &[MirrorSet]) -> Result<DiffReport> {
    let mut report = DiffReport::default();

    for mirror in mirrors {
        let repo_skills = mirror.repo.skills()?;
        let repo_names: HashSet<&str> = repo_skills.iter().map(SkillUnit::name).collect();

        for root in &mirror.installed {
            let installed = root.skills()?;

            for skill in &repo_skills {
                let status = match installed.iter().find(|s| s.name() == skill.name()) {
                    None => DiffStatus::RepoOnly,
                    Some(other) => {
                        let deltas = skill_deltas(skill, other)?;
                        if deltas.is_empty() {
                            DiffStatus::Unchanged
                        } else {
                            DiffStatus::Modified(deltas)
                        }
                    },
                };
                report.entries.push(DiffEntry {
                    mirror: mirror.name.clone(),
                    name: skill.name().to_string(),
                    root: root.name.clone(),
                    status,
                });
            }

            for skill in installed
                .iter()
                .filter(|s| !repo_names.contains(s.name()))
            {
                report.entries.push(DiffEntry {
                    mirror: mirror.name.clone(),
                    name: skill.name().to_string(),
                    root: root.name.clone(),
                    status: DiffStatus::InstalledOnly,
                });
            }
        }
    }

    Ok(report)
}

/// File-level differences between a repo unit and its installed copy.
fn skill_deltas(repo: &SkillUnit, installed: &SkillUnit) -> Result<Vec<FileDelta>> {
    match (repo, installed) {
        (SkillUnit::Directory { path: a, .. }, SkillUnit::Directory { path: b, .. }) => {
            let mut deltas = Vec::new();
            for (relative, change) in compare_trees(a, b)? {
                let kind = match change {
                    EntryChange::OnlyLeft => DeltaKind::OnlyInRepo,
                    EntryChange::OnlyRight => DeltaKind::OnlyInstalled,
                    EntryChange::Differs => {
                        let (left, right) = (a.join(&relative), b.join(&relative));
                        if left.is_file() && right.is_file() {
                            text_delta(&left, &right, &relative)?
                        } else {
                            DeltaKind::ShapeChanged
                        }
                    },
                };
                deltas.push(FileDelta { relative, kind });
            }
            Ok(deltas)
        },
        (SkillUnit::File { path: a, .. }, SkillUnit::File { path: b, .. }) => {
            let relative = PathBuf::from(repo.file_name());
            if a.file_name() != b.file_name() {
                return Ok(vec![FileDelta {
                    relative,
                    kind: DeltaKind::ShapeChanged,
                }]);
            }
            if files_equal(a, b)? {
                return Ok(Vec::new());
            }
            Ok(vec![FileDelta {
                kind: text_delta(a, b, &relative)?,
                relative,
            }])
        },
        _ => Ok(vec![FileDelta {
            relative: PathBuf::from(repo.file_name()),
            kind: DeltaKind::ShapeChanged,
        }]),
    }
}

fn text_delta(left: &Path, right: &Path, relative: &Path) -> Result<DeltaKind> {
    let (a, b) = (std::fs::read(left)?, std::fs::read(right)?);
    let (Ok(a), Ok(b)) = (String::from_utf8(a), String::from_utf8(b)) else {
        return Ok(DeltaKind::Binary);
    };

    let label = relative.display().to_string();
    let diff = TextDiff::from_lines(&a, &b);
    let mut unified = diff.unified_diff();
    unified
        .context_radius(3)
        .header(&format!("repo/{label}"), &format!("installed/{label}"));
    Ok(DeltaKind::Text(unified.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, crate::types::MirrorRoot};

    fn write(path: &Path, content: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn mirror(base: &Path) -> MirrorSet {
        MirrorSet {
            name: "skills".into(),
            repo: MirrorRoot::new("repo", base.join("repo")),
            installed: vec![MirrorRoot::new("claude", base.join("claude"))],
        }
    }

    #[test]
    fn classifies_every_status() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        write(&base.join("repo/same/SKILL.md"), b"same");
        write(&base.join("claude/same/SKILL.md"), b"same");
        write(&base.join("repo/edited/SKILL.md"), b"line one\nline two\n");
        write(&base.join("claude/edited/SKILL.md"), b"line one\nline 2\n");
        write(&base.join("repo/new.md"), b"new");
        write(&base.join("claude/local.md"), b"local");

        let report = diff(&[mirror(base)]).unwrap();
        assert!(!report.is_clean());

        let status_of = |name: &str| {
            report
                .entries
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.status.clone())
                .unwrap()
        };
        assert!(matches!(status_of("same"), DiffStatus::Unchanged));
        assert!(matches!(status_of("new"), DiffStatus::RepoOnly));
        assert!(matches!(status_of("local"), DiffStatus::InstalledOnly));

        let DiffStatus::Modified(deltas) = status_of("edited") else {
            panic!("expected modified");
        };
        assert_eq!(deltas.len(), 1);
        let DeltaKind::Text(ref text) = deltas[0].kind else {
            panic!("expected text diff");
        };
        assert!(text.contains("-line two"));
        assert!(text.contains("+line 2"));
        assert!(text.contains("repo/SKILL.md"));
    }

    #[test]
    fn binary_and_extra_files() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        write(&base.join("repo/img/logo.png"), &[0, 159, 146, 150]);
        write(&base.join("claude/img/logo.png"), &[0, 1, 2, 3]);
        write(&base.join("claude/img/extra.md"), b"x");

        let report = diff(&[mirror(base)]).unwrap();
        let DiffStatus::Modified(ref deltas) = report.entries[0].status else {
            panic!("expected modified");
        };
        assert_eq!(deltas.len(), 2);
        assert!(matches!(deltas[0].kind, DeltaKind::OnlyInstalled));
        assert!(matches!(deltas[1].kind, DeltaKind::Binary));
    }

    #[test]
    fn clean_when_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        write(&base.join("repo/a/SKILL.md"), b"a");
        write(&base.join("claude/a/SKILL.md"), b"a");
        assert!(diff(&[mirror(base)]).unwrap().is_clean());
    }
}
