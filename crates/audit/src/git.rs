//! Thin async wrappers over the `git` CLI.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use {tokio::process::Command, tracing::debug};

use crate::error::{Error, Result};

async fn run_git<I, S>(dir: &Path, operation: &'static str, args: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| Error::command_execution(operation, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::command_failed(operation, stderr.trim()));
    }
    Ok(output.stdout)
}

fn split_nul(stdout: &[u8]) -> Vec<PathBuf> {
    stdout
        .split(|b| *b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| PathBuf::from(String::from_utf8_lossy(s).into_owned()))
        .collect()
}

fn trimmed_path(stdout: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(stdout).trim_end_matches(['\n', '\r']))
}

/// Root of the work tree containing `dir`.
pub async fn toplevel(dir: &Path) -> Result<PathBuf> {
    match run_git(dir, "git rev-parse --show-toplevel", ["rev-parse", "--show-toplevel"]).await {
        Ok(stdout) => Ok(trimmed_path(&stdout)),
        Err(Error::CommandFailed { stderr, .. }) => {
            debug!(dir = %dir.display(), stderr = %stderr, "not a git work tree");
            Err(Error::NotGitRepository {
                path: dir.to_path_buf(),
            })
        },
        Err(e) => Err(e),
    }
}

pub async fn is_work_tree(dir: &Path) -> bool {
    run_git(dir, "git rev-parse --is-inside-work-tree", [
        "rev-parse",
        "--is-inside-work-tree",
    ])
    .await
    .is_ok_and(|out| out.starts_with(b"true"))
}

/// Tracked files under `paths`, relative to `repo_root`.
pub async fn tracked_files(repo_root: &Path, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut args: Vec<&OsStr> = vec![OsStr::new("ls-files"), OsStr::new("-z"), OsStr::new("--")];
    args.extend(paths.iter().map(|p| p.as_os_str()));
    let stdout = run_git(repo_root, "git ls-files", args).await?;
    Ok(split_nul(&stdout))
}

/// Added, copied or modified paths in the index, relative to `repo_root`.
pub async fn staged_files(repo_root: &Path) -> Result<Vec<PathBuf>> {
    let stdout = run_git(repo_root, "git diff --cached", [
        "diff",
        "--cached",
        "--name-only",
        "--diff-filter=ACM",
        "-z",
    ])
    .await?;
    Ok(split_nul(&stdout))
}

/// Content of `path` as staged in the index.
pub async fn staged_blob(repo_root: &Path, path: &Path) -> Result<Vec<u8>> {
    let object = format!(":{}", path.display());
    run_git(repo_root, "git show", ["show", object.as_str()]).await
}

/// Directory git reads hooks from, honouring `core.hooksPath`.
pub async fn hooks_dir(repo_root: &Path) -> Result<PathBuf> {
    let stdout = run_git(repo_root, "git rev-parse --git-path hooks", [
        "rev-parse",
        "--git-path",
        "hooks",
    ])
    .await?;
    Ok(repo_root.join(trimmed_path(&stdout)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?}: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    pub(crate) async fn init_test_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-b", "main"]).await;
        git(dir.path(), &["config", "user.email", "test@test.com"]).await;
        git(dir.path(), &["config", "user.name", "Test"]).await;
        dir
    }

    #[tokio::test]
    async fn toplevel_outside_repo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = toplevel(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::NotGitRepository { .. }));
        assert!(!is_work_tree(dir.path()).await);
    }

    #[tokio::test]
    async fn lists_tracked_and_staged_files() {
        let dir = init_test_repo().await;
        let root = dir.path();
        std::fs::create_dir_all(root.join("skills/a")).unwrap();
        std::fs::write(root.join("skills/a/SKILL.md"), "committed\n").unwrap();
        std::fs::write(root.join("README.md"), "readme\n").unwrap();
        git(root, &["add", "."]).await;
        git(root, &["commit", "-m", "init"]).await;

        assert!(is_work_tree(root).await);
        let tracked = tracked_files(root, &[PathBuf::from("skills")]).await.unwrap();
        assert_eq!(tracked, vec![PathBuf::from("skills/a/SKILL.md")]);

        assert!(staged_files(root).await.unwrap().is_empty());

        std::fs::write(root.join("skills/a/SKILL.md"), "staged\n").unwrap();
        git(root, &["add", "skills/a/SKILL.md"]).await;
        std::fs::write(root.join("skills/a/SKILL.md"), "working tree\n").unwrap();

        let staged = staged_files(root).await.unwrap();
        assert_eq!(staged, vec![PathBuf::from("skills/a/SKILL.md")]);
        let blob = staged_blob(root, &staged[0]).await.unwrap();
        assert_eq!(blob, b"staged\n");
    }

    #[tokio::test]
    async fn hooks_dir_is_absolute() {
        let dir = init_test_repo().await;
        let hooks = hooks_dir(dir.path()).await.unwrap();
        assert!(hooks.is_absolute());
        assert!(hooks.ends_with(".git/hooks"));
    }
}
