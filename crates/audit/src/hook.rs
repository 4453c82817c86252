//! Pre-commit hook installer.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    error::{Context, Result},
    git,
};

pub const HOOK_NAME: &str = "pre-commit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Created,
    /// A different hook was overwritten.
    Replaced,
    /// The hook already had this exact content.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct HookInstall {
    pub path: PathBuf,
    pub outcome: HookOutcome,
}

fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// POSIX shell dispatcher that runs `<exe> [--config <path>] audit pre-commit`.
pub fn hook_script(exe: &Path, config: Option<&Path>) -> String {
    let mut command = shell_quote(&exe.display().to_string());
    if let Some(config) = config {
        command.push_str(" --config ");
        command.push_str(&shell_quote(&config.display().to_string()));
    }
    format!(
        "#!/bin/sh\n# Installed by `skillsync audit install-hook`.\nexec {command} audit {HOOK_NAME} \"$@\"\n"
    )
}

/// Write the hook into the repository's hooks directory.
pub async fn install_hook(
    repo_root: &Path,
    exe: &Path,
    config: Option<&Path>,
) -> Result<HookInstall> {
    let top = git::toplevel(repo_root).await?;
    let dir = git::hooks_dir(&top).await?;
    let path = dir.join(HOOK_NAME);
    let script = hook_script(exe, config);

    let outcome = match std::fs::read_to_string(&path) {
        Ok(existing) if existing == script => {
            debug!(path = %path.display(), "hook already installed");
            return Ok(HookInstall {
                path,
                outcome: HookOutcome::Unchanged,
            });
        },
        Ok(_) => {
            warn!(path = %path.display(), "replacing existing pre-commit hook");
            HookOutcome::Replaced
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HookOutcome::Created,
        Err(e) => {
            // Unreadable (binary or permissions); overwrite like any other hook.
            warn!(path = %path.display(), error = %e, "replacing unreadable pre-commit hook");
            HookOutcome::Replaced
        },
    };

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    std::fs::write(&path, &script)
        .with_context(|| format!("failed to write {}", path.display()))?;
    make_executable(&path)?;

    debug!(path = %path.display(), ?outcome, "installed pre-commit hook");
    Ok(HookInstall { path, outcome })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, crate::git::tests::init_test_repo};

    #[test]
    fn script_quotes_paths() {
        let script = hook_script(
            Path::new("/opt/my tools/skillsync"),
            Some(Path::new("/home/u/it's.toml")),
        );
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(
            "exec '/opt/my tools/skillsync' --config '/home/u/it'\\''s.toml' audit pre-commit \"$@\""
        ));
        assert!(!hook_script(Path::new("/bin/skillsync"), None).contains("--config"));
    }

    #[tokio::test]
    async fn install_is_idempotent_and_replaces_foreign_hooks() {
        let dir = init_test_repo().await;
        let exe = Path::new("/usr/local/bin/skillsync");

        let first = install_hook(dir.path(), exe, None).await.unwrap();
        assert_eq!(first.outcome, HookOutcome::Created);
        assert_eq!(
            std::fs::read_to_string(&first.path).unwrap(),
            hook_script(exe, None)
        );

        let again = install_hook(dir.path(), exe, None).await.unwrap();
        assert_eq!(again.outcome, HookOutcome::Unchanged);

        std::fs::write(&first.path, "#!/bin/sh\nexit 0\n").unwrap();
        let replaced = install_hook(dir.path(), exe, None).await.unwrap();
        assert_eq!(replaced.outcome, HookOutcome::Replaced);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&first.path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn install_outside_git_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = install_hook(tmp.path(), Path::new("skillsync"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::NotGitRepository { .. }));
    }
}
