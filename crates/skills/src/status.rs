//! Presence matrix: one row per skill name, one column per root.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{error::Result, types::MirrorSet};

#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    pub name: String,
    /// Parallel to [`StatusMatrix::roots`].
    pub present: Vec<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusMatrix {
    pub mirror: String,
    pub roots: Vec<String>,
    pub rows: Vec<StatusRow>,
}

pub fn status(mirror: &MirrorSet) -> Result<StatusMatrix> {
    let roots: Vec<_> = mirror.roots().collect();
    let mut by_name: BTreeMap<String, Vec<bool>> = BTreeMap::new();

    for (column, root) in roots.iter().enumerate() {
        for skill in root.skills()? {
            by_name
                .entry(skill.name().to_string())
                .or_insert_with(|| vec![false; roots.len()])[column] = true;
        }
    }

    Ok(StatusMatrix {
        mirror: mirror.name.clone(),
        roots: roots.iter().map(|r| r.name.clone()).collect(),
        rows: by_name
            .into_iter()
            .map(|(name, present)| StatusRow { name, present })
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, crate::types::MirrorRoot};

    #[test]
    fn matrix_covers_union_of_names() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        std::fs::create_dir_all(base.join("repo/a")).unwrap();
        std::fs::create_dir_all(base.join("claude")).unwrap();
        std::fs::write(base.join("claude/b.md"), "b").unwrap();
        std::fs::create_dir_all(base.join("claude/a")).unwrap();

        let mirror = MirrorSet {
            name: "skills".into(),
            repo: MirrorRoot::new("repo", base.join("repo")),
            installed: vec![
                MirrorRoot::new("claude", base.join("claude")),
                MirrorRoot::new("codex", base.join("codex")),
            ],
        };
        let matrix = status(&mirror).unwrap();

        assert_eq!(matrix.roots, vec!["repo", "claude", "codex"]);
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[0].name, "a");
        assert_eq!(matrix.rows[0].present, vec![true, true, false]);
        assert_eq!(matrix.rows[1].name, "b");
        assert_eq!(matrix.rows[1].present, vec![false, true, false]);

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["rows"][1]["present"][1], true);
    }
}
