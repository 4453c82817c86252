//! Recursive copy and byte-for-byte comparison of skill trees.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::error::Result;

/// What differs for one relative path between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryChange {
    OnlyLeft,
    OnlyRight,
    /// Both sides have it but contents (or file/dir shape) differ.
    Differs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryShape {
    Dir,
    File,
}

/// Recursively copy a directory.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// List every entry under `root` keyed by its path relative to `root`.
fn index_tree(root: &Path) -> Result<BTreeMap<PathBuf, EntryShape>> {
    let mut out = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = entry?;
        let shape = if entry.file_type().is_dir() {
            EntryShape::Dir
        } else {
            EntryShape::File
        };
        out.insert(entry.path().strip_prefix(root)?.to_path_buf(), shape);
    }
    Ok(out)
}

/// Byte equality of two files.
pub fn files_equal(a: &Path, b: &Path) -> Result<bool> {
    let (ma, mb) = (std::fs::metadata(a)?, std::fs::metadata(b)?);
    if ma.len() != mb.len() {
        return Ok(false);
    }
    Ok(std::fs::read(a)? == std::fs::read(b)?)
}

/// Compare two directory trees. Returns the differing relative paths in
/// sorted order; an empty result means the trees are identical.
pub fn compare_trees(left: &Path, right: &Path) -> Result<Vec<(PathBuf, EntryChange)>> {
    let left_index = index_tree(left)?;
    let right_index = index_tree(right)?;
    let mut changes = Vec::new();

    for (relative, shape) in &left_index {
        match right_index.get(relative) {
            None => changes.push((relative.clone(), EntryChange::OnlyLeft)),
            Some(other) if other != shape => {
                changes.push((relative.clone(), EntryChange::Differs));
            },
            Some(EntryShape::File) => {
                if !files_equal(&left.join(relative), &right.join(relative))? {
                    changes.push((relative.clone(), EntryChange::Differs));
                }
            },
            Some(EntryShape::Dir) => {},
        }
    }
    for relative in right_index.keys() {
        if !left_index.contains_key(relative) {
            changes.push((relative.clone(), EntryChange::OnlyRight));
        }
    }

    changes.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(changes)
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
    fn copy_preserves_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("SKILL.md"), "entry");
        write(&src.join("scripts/run.sh"), "#!/bin/sh");
        std::fs::create_dir_all(src.join("empty")).unwrap();

        let dest = tmp.path().join("dest");
        copy_dir_recursive(&src, &dest).unwrap();

        assert_eq!(std::fs::read_to_string(dest.join("SKILL.md")).unwrap(), "entry");
        assert!(dest.join("scripts/run.sh").is_file());
        assert!(dest.join("empty").is_dir());
        assert!(compare_trees(&src, &dest).unwrap().is_empty());
    }

    #[test]
    fn compare_reports_each_kind_of_change() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        write(&a.join("same.md"), "x");
        write(&b.join("same.md"), "x");
        write(&a.join("changed.md"), "old");
        write(&b.join("changed.md"), "new");
        write(&a.join("left.md"), "l");
        write(&b.join("right.md"), "r");

        let changes = compare_trees(&a, &b).unwrap();
        assert_eq!(changes, vec![
            (PathBuf::from("changed.md"), EntryChange::Differs),
            (PathBuf::from("left.md"), EntryChange::OnlyLeft),
            (PathBuf::from("right.md"), EntryChange::OnlyRight),
        ]);
    }

    #[test]
    fn file_versus_directory_differs() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        write(&a.join("refs"), "file");
        std::fs::create_dir_all(b.join("refs")).unwrap();

        let changes = compare_trees(&a, &b).unwrap();
        assert_eq!(changes, vec![(PathBuf::from("refs"), EntryChange::Differs)]);
    }
}
