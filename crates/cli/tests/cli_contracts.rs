//! Exit codes and output of the `skillsync` binary as git hooks and scripts
//! see them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use {
    assert_cmd::Command,
    predicates::str::{contains, is_empty},
};

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git");
    assert!(status.success(), "git {args:?}");
}

fn fixture_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-b", "main"]);
    std::fs::write(dir.path().join("skillsync.toml"), "").unwrap();
    std::fs::write(dir.path().join(".audit-blocklist"), "acme-internal\n").unwrap();
    dir
}

fn skillsync(repo: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_skillsync"));
    cmd.current_dir(repo)
        .env_remove("RUST_LOG")
        .env_remove("SKILLSYNC_CONFIG")
        .env_remove("SKILLSYNC_REPO")
        .arg("--repo")
        .arg(repo)
        .arg("--config")
        .arg(repo.join("skillsync.toml"));
    cmd
}

#[test]
fn pre_commit_with_nothing_staged_is_silent() {
    let repo = fixture_repo();
    skillsync(repo.path())
        .args(["audit", "pre-commit"])
        .assert()
        .success()
        .stdout(is_empty())
        .stderr(is_empty());
}

#[test]
fn pre_commit_blocks_staged_term() {
    let repo = fixture_repo();
    std::fs::create_dir_all(repo.path().join("skills")).unwrap();
    std::fs::write(repo.path().join("skills/deploy.md"), "ship it\ncall acme-internal\n").unwrap();
    git(repo.path(), &["add", "skills/deploy.md"]);

    skillsync(repo.path())
        .args(["audit", "pre-commit"])
        .assert()
        .code(1)
        .stdout(contains("skills/deploy.md:2:call acme-internal"))
        .stderr(contains("commit blocked"));
}

#[test]
fn check_exits_one_on_violation_without_colour_when_piped() {
    let repo = fixture_repo();
    std::fs::create_dir_all(repo.path().join("skills/notes")).unwrap();
    std::fs::write(
        repo.path().join("skills/notes/SKILL.md"),
        "uses the acme-internal api\n",
    )
    .unwrap();
    git(repo.path(), &["add", "."]);

    skillsync(repo.path())
        .args(["audit", "check"])
        .assert()
        .code(1)
        .stdout(contains("skills/notes/SKILL.md:1:uses the acme-internal api"))
        .stderr(contains("audit check: 1 violation(s) in 1 file(s) scanned"));
}

#[test]
fn clean_check_reports_file_count() {
    let repo = fixture_repo();
    std::fs::create_dir_all(repo.path().join("skills")).unwrap();
    std::fs::write(repo.path().join("skills/plain.md"), "nothing to see\n").unwrap();
    git(repo.path(), &["add", "."]);

    skillsync(repo.path())
        .args(["audit", "check"])
        .assert()
        .success()
        .stdout(contains("No violations (1 files scanned)"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let repo = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_skillsync"))
        .current_dir(repo.path())
        .assert()
        .code(2)
        .stderr(contains("Usage"));

    Command::new(env!("CARGO_BIN_EXE_skillsync"))
        .current_dir(repo.path())
        .arg("audit")
        .assert()
        .code(2);
}
