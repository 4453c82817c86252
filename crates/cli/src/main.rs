mod audit_commands;
mod config_commands;
mod output;
mod scan_commands;
mod sync_commands;
mod workspace;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use crate::workspace::Workspace;

#[derive(Parser)]
#[command(
    name = "skillsync",
    version,
    about = "skillsync: mirror, audit, and discover AI-assistant skills"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (overrides the default search).
    #[arg(long, global = true, env = "SKILLSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Skills repository root (default: enclosing git work tree, else the
    /// current directory).
    #[arg(long, global = true, env = "SKILLSYNC_REPO")]
    repo: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the repo store with installed assistant directories.
    Sync {
        #[command(subcommand)]
        action: sync_commands::SyncAction,
    },
    /// Block private terms and personal paths from the repository.
    Audit {
        #[command(subcommand)]
        action: audit_commands::AuditAction,
    },
    /// Find skill candidates in other projects.
    Scan {
        #[command(subcommand)]
        action: scan_commands::ScanAction,
    },
    /// Configuration inspection and validation.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

/// Logs go to stderr so reports on stdout stay pipeable.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(atty::is(atty::Stream::Stderr))
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "skillsync starting");

    // `config check` must run even when the config file does not parse.
    if let Commands::Config { action } = cli.command {
        return config_commands::handle_config(action, cli.config.as_deref(), cli.repo.as_deref())
            .await;
    }

    let ws = Workspace::load(cli.config.as_deref(), cli.repo.as_deref()).await?;

    match cli.command {
        Commands::Sync { action } => sync_commands::handle_sync(action, &ws),
        Commands::Audit { action } => audit_commands::handle_audit(action, &ws).await,
        Commands::Scan { action } => scan_commands::handle_scan(action, &ws),
        Commands::Config { .. } => Ok(()),
    }
}
