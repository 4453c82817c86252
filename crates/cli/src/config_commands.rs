use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    skillsync_config::{Severity, find_config_file, to_toml, validate},
};

use crate::{
    output::Palette,
    workspace::{Workspace, resolve_repo_root},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration as TOML.
    Show,
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
}

pub async fn handle_config(
    action: ConfigAction,
    config_flag: Option<&Path>,
    repo_flag: Option<&Path>,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let ws = Workspace::load(config_flag, repo_flag).await?;
            match &ws.config_path {
                Some(path) => eprintln!("# from {}", path.display()),
                None => eprintln!("# no config file found; built-in defaults"),
            }
            print!("{}", to_toml(&ws.config)?);
            Ok(())
        },
        ConfigAction::Check { verbose } => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            let repo_root = resolve_repo_root(&cwd, repo_flag).await;
            let path: Option<PathBuf> = match config_flag {
                Some(p) => Some(skillsync_common::paths::resolve_against(&cwd, p)),
                None => find_config_file(&repo_root),
            };
            check(path.as_deref(), &repo_root, verbose);
            Ok(())
        },
    }
}

fn check(path: Option<&Path>, repo_root: &Path, verbose: bool) {
    let result = validate(path, repo_root);

    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let palette = Palette::stderr();
    let (bold, reset) = (palette.bold, palette.reset);
    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let (color, label) = match d.severity {
            Severity::Error => (palette.red, "error"),
            Severity::Warning => (palette.yellow, "warning"),
            Severity::Info => (palette.cyan, "info"),
        };

        if d.path.is_empty() {
            eprintln!("  {bold}{color}{label}{reset} {}", d.message);
        } else {
            eprintln!("  {bold}{color}{label}{reset} {}: {}", d.path, d.message);
        }
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }
}
