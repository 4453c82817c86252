//! File collection for `check` and `pre-commit`.

use std::path::{Path, PathBuf};

use {
    tracing::{debug, warn},
    walkdir::WalkDir,
};

use crate::{
    error::{Context, Result},
    git,
    rules::{RuleSet, Violation},
};

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub files_scanned: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn record(&mut self, violations: Vec<Violation>) {
        self.files_scanned += 1;
        self.violations.extend(violations);
    }
}

/// Scan every tracked file under `paths`. Outside a git work tree the
/// directories are walked instead.
pub async fn check(repo_root: &Path, paths: &[PathBuf], rules: &RuleSet) -> Result<AuditReport> {
    let files = collect_files(repo_root, paths).await?;
    debug!(count = files.len(), "auditing files");

    let mut report = AuditReport::default();
    for relative in files {
        let full = repo_root.join(&relative);
        if full.is_dir() {
            continue;
        }
        let bytes = match std::fs::read(&full) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %full.display(), "tracked file missing from work tree, skipping");
                continue;
            },
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", full.display()));
            },
        };
        report.record(rules.scan_bytes(&relative, &bytes));
    }
    Ok(report)
}

/// Scan the staged content of every added, copied or modified file.
pub async fn pre_commit(repo_root: &Path, rules: &RuleSet) -> Result<AuditReport> {
    let top = git::toplevel(repo_root).await?;
    let mut report = AuditReport::default();
    for relative in git::staged_files(&top).await? {
        let blob = git::staged_blob(&top, &relative).await?;
        report.record(rules.scan_bytes(&relative, &blob));
    }
    Ok(report)
}

async fn collect_files(repo_root: &Path, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let in_git = git::is_work_tree(repo_root).await;
    let mut files = Vec::new();
    let mut pathspecs = Vec::new();

    for path in paths {
        match path.strip_prefix(repo_root) {
            Ok(relative) if in_git => {
                if relative.as_os_str().is_empty() {
                    pathspecs.push(PathBuf::from("."));
                } else {
                    pathspecs.push(relative.to_path_buf());
                }
            },
            _ => files.extend(walk(repo_root, path)?),
        }
    }
    if !pathspecs.is_empty() {
        files.extend(git::tracked_files(repo_root, &pathspecs).await?);
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Regular files under `dir`, skipping `.git`. Paths inside `repo_root` are
/// returned relative to it.
fn walk(repo_root: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        debug!(path = %dir.display(), "audit path does not exist");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    let entries = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");
    for entry in entries {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        files.push(
            path.strip_prefix(repo_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.to_path_buf()),
        );
    }
    Ok(files)
}
