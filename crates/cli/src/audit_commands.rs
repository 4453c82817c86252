//! `skillsync audit` subcommands.

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    skillsync_audit::{AuditReport, HookOutcome, RuleSet, check, install_hook, pre_commit},
};

use crate::{
    output::{Palette, failure, warning},
    workspace::Workspace,
};

#[derive(Subcommand)]
pub enum AuditAction {
    /// Scan tracked files under the audit paths.
    Check,
    /// Scan the staged content of the pending commit.
    PreCommit,
    /// Install a git pre-commit hook that runs `audit pre-commit`.
    InstallHook,
}

pub async fn handle_audit(action: AuditAction, ws: &Workspace) -> Result<()> {
    match action {
        AuditAction::Check => {
            let rules = rule_set(ws)?;
            let paths = ws.config.audit_paths(&ws.repo_root);
            let report = check(&ws.repo_root, &paths, &rules).await?;
            finish(&report, "audit check");
            if report.is_clean() {
                let Palette {
                    green, dim, reset, ..
                } = Palette::stdout();
                println!(
                    "{green}No violations{reset} {dim}({} files scanned){reset}",
                    report.files_scanned
                );
            }
            Ok(())
        },
        AuditAction::PreCommit => {
            let rules = rule_set(ws)?;
            let report = pre_commit(&ws.repo_root, &rules).await?;
            // A clean commit stays silent.
            finish(&report, "commit blocked");
            Ok(())
        },
        AuditAction::InstallHook => {
            let exe = std::env::current_exe().context("failed to locate the skillsync binary")?;
            let installed = install_hook(&ws.repo_root, &exe, ws.config_flag.as_deref()).await?;
            let path = ws.display(&installed.path);
            match installed.outcome {
                HookOutcome::Created => println!("Installed pre-commit hook at {path}"),
                HookOutcome::Replaced => {
                    warning(format!("replaced existing hook at {path}"));
                    println!("Installed pre-commit hook at {path}");
                },
                HookOutcome::Unchanged => {},
            }
            Ok(())
        },
    }
}

fn rule_set(ws: &Workspace) -> Result<RuleSet> {
    let policy = ws.policy()?;
    Ok(RuleSet::new(&policy.audit_terms())?)
}

/// Print violations and exit 1 when there are any.
fn finish(report: &AuditReport, verdict: &str) {
    if report.is_clean() {
        return;
    }
    for violation in &report.violations {
        println!("{violation}");
    }
    eprintln!();
    let Palette {
        bold, red, reset, ..
    } = Palette::stderr();
    failure(format!(
        "{verdict}: {bold}{red}{}{reset} violation(s) in {} file(s) scanned",
        report.violations.len(),
        report.files_scanned
    ));
    eprintln!("Remove the lines above or move the content out of the shared repository.");
    std::process::exit(1);
}
