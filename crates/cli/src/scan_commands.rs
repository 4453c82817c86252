//! `skillsync scan` subcommands.

use std::path::PathBuf;

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    skillsync_discovery::{
        Discovery, Tagger, check_table, discover, load_manifest, report_markdown, scan_text,
    },
};

use crate::{output::warning, workspace::Workspace};

#[derive(Subcommand)]
pub enum ScanAction {
    /// Summarise candidates per project.
    Scan,
    /// Count artifacts per project and category.
    Check,
    /// Write a full markdown report.
    Report {
        /// Report path (default: `discovery.report` from the config).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn handle_scan(action: ScanAction, ws: &Workspace) -> Result<()> {
    let manifest = ws.resolve(&ws.config.discovery.manifest);
    let entries = load_manifest(&manifest, &ws.repo_root)?;
    let discovery = discover(&entries, &ws.repo_root)?;
    for path in discovery.missing() {
        warning(format!("project not found, skipping: {}", path.display()));
    }

    match action {
        ScanAction::Scan => {
            let tagger = tagger(ws)?;
            let text = scan_text(&discovery, &tagger);
            if text.is_empty() {
                println!("No artifacts found.");
            } else {
                print!("{text}");
            }
        },
        ScanAction::Check => print!("{}", check_table(&discovery)),
        ScanAction::Report { output } => {
            let tagger = tagger(ws)?;
            write_report(ws, &discovery, &tagger, output)?;
        },
    }
    Ok(())
}

fn tagger(ws: &Workspace) -> Result<Tagger> {
    let policy = ws.policy()?;
    Ok(Tagger::new(&ws.mirrors(), &policy.exclusions)?)
}

fn write_report(
    ws: &Workspace,
    discovery: &Discovery,
    tagger: &Tagger,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = match output {
        Some(path) => skillsync_common::paths::resolve_against(&std::env::current_dir()?, &path),
        None => ws.resolve(&ws.config.discovery.report),
    };
    let markdown = report_markdown(discovery, tagger, chrono::Local::now());
    std::fs::write(&path, markdown)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Wrote report for {} project(s) to {}",
        discovery.non_empty().count(),
        ws.display(&path)
    );
    Ok(())
}
