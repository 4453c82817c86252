//! Path helpers shared by the config loader and the discovery manifest.

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// Paths without a tilde prefix (and `~user` forms) are returned unchanged.
pub fn expand_tilde(raw: &str) -> PathBuf {
    expand_tilde_with(raw, dirs_next::home_dir())
}

/// Same as [`expand_tilde`] with an explicit home directory, so tests do not
/// depend on the process environment.
pub fn expand_tilde_with(raw: &str, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(raw);
    };
    if raw == "~" {
        return home;
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Render `path` relative to `base` when it lives underneath it.
pub fn display_relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        let home = Some(PathBuf::from("/h/me"));
        assert_eq!(
            expand_tilde_with("~/.claude/skills", home.clone()),
            PathBuf::from("/h/me/.claude/skills")
        );
        assert_eq!(expand_tilde_with("~", home), PathBuf::from("/h/me"));
    }

    #[test]
    fn leaves_other_paths_alone() {
        let home = Some(PathBuf::from("/h/me"));
        assert_eq!(
            expand_tilde_with("/abs/path", home.clone()),
            PathBuf::from("/abs/path")
        );
        assert_eq!(
            expand_tilde_with("~other/x", home),
            PathBuf::from("~other/x")
        );
        assert_eq!(expand_tilde_with("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn relative_display_strips_base() {
        let base = Path::new("/repo");
        assert_eq!(
            display_relative(base, Path::new("/repo/skills/a/SKILL.md")),
            "skills/a/SKILL.md"
        );
        assert_eq!(display_relative(base, Path::new("/elsewhere")), "/elsewhere");
    }
}
