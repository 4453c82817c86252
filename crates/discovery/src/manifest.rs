//! The project manifest: one `path|description` per line.

use std::path::{Path, PathBuf};

use skillsync_common::paths::{expand_tilde, resolve_against};

use crate::error::{Context, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// The path as written, before expansion.
    pub raw: String,
    pub path: PathBuf,
    pub description: Option<String>,
}

/// Parse manifest text. Relative paths are taken from `base`.
pub fn parse(text: &str, base: &Path) -> Vec<ManifestEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (raw, description) = match line.split_once('|') {
                Some((raw, rest)) => (raw.trim(), Some(rest.trim())),
                None => (line, None),
            };
            if raw.is_empty() {
                return None;
            }
            Some(ManifestEntry {
                raw: raw.to_string(),
                path: resolve_against(base, &expand_tilde(raw)),
                description: description.filter(|d| !d.is_empty()).map(str::to_string),
            })
        })
        .collect()
}

/// Read the manifest. Unlike the policy lists, a missing manifest is an error.
pub fn load(path: &Path, base: &Path) -> Result<Vec<ManifestEntry>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse(&text, base)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::ManifestNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn only_the_path_segment_is_used() {
        let entries = parse(
            "# projects\n\n/src/api|Billing API | v2\n  relative/tool  \n|no path\n",
            Path::new("/repo"),
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, PathBuf::from("/src/api"));
        assert_eq!(entries[0].description.as_deref(), Some("Billing API | v2"));
        assert_eq!(entries[1].path, PathBuf::from("/repo/relative/tool"));
        assert_eq!(entries[1].description, None);
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs_home() else {
            return;
        };
        let entries = parse("~/work/app|app\n", Path::new("/repo"));
        assert_eq!(entries[0].path, home.join("work/app"));
        assert_eq!(entries[0].raw, "~/work/app");
    }

    fn dirs_home() -> Option<PathBuf> {
        let expanded = expand_tilde("~");
        (expanded != Path::new("~")).then_some(expanded)
    }

    #[test]
    fn missing_manifest_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load(&tmp.path().join(".scan-projects"), tmp.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound { .. }));
    }
}
