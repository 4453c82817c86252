//! `skillsync sync` subcommands.

use {
    anyhow::Result,
    clap::Subcommand,
    skillsync_skills::{
        DeltaKind, DiffReport, DiffStatus, StatusMatrix, SyncPlan, apply, diff, plan_pull,
        plan_push, status,
    },
};

use crate::{
    output::{Palette, warning},
    workspace::Workspace,
};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Copy installed skills into the repo store, honouring exclusions.
    Pull {
        /// Print the planned actions without touching the filesystem.
        #[arg(long)]
        dry_run: bool,
    },
    /// Copy every repo skill into every installed root.
    Push {
        /// Print the planned actions without touching the filesystem.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show differences between the repo store and installed roots.
    Diff,
    /// Show which root holds which skill.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Pull,
    Push,
}

pub fn handle_sync(action: SyncAction, ws: &Workspace) -> Result<()> {
    let mirrors = ws.mirrors();
    match action {
        SyncAction::Pull { dry_run } => {
            let policy = ws.policy()?;
            let plan = plan_pull(&mirrors, &policy.exclusions)?;
            run_plan(Direction::Pull, &plan, dry_run)
        },
        SyncAction::Push { dry_run } => run_plan(Direction::Push, &plan_push(&mirrors)?, dry_run),
        SyncAction::Diff => {
            print_diff(&diff(&mirrors)?);
            Ok(())
        },
        SyncAction::Status { json } => {
            let matrices = mirrors.iter().map(status).collect::<Result<Vec<_>, _>>()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matrices)?);
            } else {
                for matrix in &matrices {
                    print_status(matrix);
                }
            }
            Ok(())
        },
    }
}

fn run_plan(direction: Direction, plan: &SyncPlan, dry_run: bool) -> Result<()> {
    let Palette {
        bold,
        cyan,
        dim,
        yellow,
        reset,
        ..
    } = Palette::stdout();
    for collision in &plan.collisions {
        warning(format!(
            "{}/{}: {} differs from {}, keeping {}",
            collision.mirror, collision.name, collision.loser, collision.winner, collision.winner
        ));
    }

    if dry_run {
        if plan.is_noop() {
            println!("Nothing to do.");
        }
        for action in &plan.actions {
            println!("{dim}would{reset} {}", action.describe());
        }
    } else {
        apply(plan)?;
    }

    for row in &plan.summary {
        let c = &row.counts;
        let mut line = format!(
            "{bold}{}{reset} -> {cyan}{}{reset}: {} added, {} updated, {} unchanged",
            row.mirror, row.root, c.added, c.updated, c.unchanged
        );
        if direction == Direction::Pull {
            line.push_str(&format!(", {} excluded ({} removed)", c.excluded, c.removed));
            if c.collisions > 0 {
                line.push_str(&format!(", {yellow}{} collisions{reset}", c.collisions));
            }
        }
        println!("{line}");
    }
    Ok(())
}

fn print_diff(report: &DiffReport) {
    let Palette {
        bold,
        green,
        yellow,
        reset,
        ..
    } = Palette::stdout();
    if report.is_clean() {
        println!("{green}Everything in sync{reset}");
        return;
    }
    for entry in report.differences() {
        let id = format!("{}/{}", entry.mirror, entry.name);
        match &entry.status {
            DiffStatus::Unchanged => {},
            DiffStatus::RepoOnly => {
                println!("{yellow}only in repo{reset}  {id} (missing from {})", entry.root);
            },
            DiffStatus::InstalledOnly => {
                println!("{yellow}only in {}{reset}  {id}", entry.root);
            },
            DiffStatus::Modified(deltas) => {
                println!("{bold}modified{reset}  {id} (repo vs {})", entry.root);
                for delta in deltas {
                    let rel = delta.relative.display();
                    match &delta.kind {
                        DeltaKind::OnlyInRepo => println!("    only in repo: {rel}"),
                        DeltaKind::OnlyInstalled => println!("    only in {}: {rel}", entry.root),
                        DeltaKind::ShapeChanged => {
                            println!("    file/directory mismatch: {rel}");
                        },
                        DeltaKind::Binary => println!("    binary files differ: {rel}"),
                        DeltaKind::Text(unified) => print!("{unified}"),
                    }
                }
            },
        }
    }
}

fn print_status(matrix: &StatusMatrix) {
    let Palette { bold, reset, .. } = Palette::stdout();
    println!("{bold}{}{reset}", matrix.mirror);
    if matrix.rows.is_empty() {
        println!("  (empty)\n");
        return;
    }
    let name_width = matrix
        .rows
        .iter()
        .map(|r| r.name.len())
        .chain(["NAME".len()])
        .max()
        .unwrap_or_default();

    let mut header = format!("  {:<name_width$}", "NAME");
    for root in &matrix.roots {
        header.push_str(&format!("  {root:>width$}", width = root.len().max(3)));
    }
    println!("{header}");

    for row in &matrix.rows {
        let mut line = format!("  {:<name_width$}", row.name);
        for (root, present) in matrix.roots.iter().zip(&row.present) {
            let cell = if *present {
                "yes"
            } else {
                "--"
            };
            line.push_str(&format!("  {cell:>width$}", width = root.len().max(3)));
        }
        println!("{line}");
    }
    println!();
}
