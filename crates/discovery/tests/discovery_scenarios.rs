#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use {
    skillsync_config::{NameList, SkillsyncConfig},
    skillsync_discovery::{Tagger, discover, load_manifest, scan_text},
    skillsync_skills::MirrorSet,
};

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "").unwrap();
}

#[test]
fn missing_project_does_not_stop_the_scan() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path();
    let repo = base.join("repo");
    touch(&repo.join("skills/writer/SKILL.md"));
    touch(&base.join("app/.claude/skills/writer/SKILL.md"));
    touch(&base.join("app/.claude/skills/private-ops/SKILL.md"));
    touch(&base.join("app/.claude/commands/ship.md"));

    std::fs::write(
        repo.join(".scan-projects"),
        format!(
            "# machine-local\n{b}/deleted|gone\n{b}/app|main app\n",
            b = base.display()
        ),
    )
    .unwrap();

    let entries = load_manifest(&repo.join(".scan-projects"), &repo).unwrap();
    let found = discover(&entries, &repo).unwrap();
    assert_eq!(found.missing().count(), 1);
    assert_eq!(found.projects.len(), 1);

    let config = SkillsyncConfig::default();
    let mirrors: Vec<MirrorSet> = config
        .mirrors
        .iter()
        .map(|m| MirrorSet {
            installed: Vec::new(),
            ..MirrorSet::from_config(m, &repo)
        })
        .collect();
    let tagger = Tagger::new(&mirrors, &NameList::parse("private-ops\n")).unwrap();

    let text = scan_text(&found, &tagger);
    assert!(text.contains("[COLLECTED] writer"));
    assert!(text.contains("[EXCLUDED] private-ops"));
    assert!(text.contains("[NEW] ship"));
}
