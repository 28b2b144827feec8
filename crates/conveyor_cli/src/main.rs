//! Conveyor CLI - control plane for the legacy store synchronizer.

mod commands;
mod config;

use clap::{Parser, ValueEnum};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conveyor")]
#[command(version)]
#[command(about = "Live synchronization of a legacy store into a redesigned schema")]
#[command(
    long_about = "Conveyor keeps a redesigned target database in sync with a legacy \
relational store while both stay online. Each business domain has its own sync adapter \
and a durable sync_status row holding its checkpoint, lifecycle state, and counters."
)]
#[command(after_long_help = r#"EXAMPLES
    One-off full migration of every registered domain:
        $ conveyor --mode initial

    Full migration of a single domain:
        $ conveyor --mode initial --domain member

    Run the incremental scheduler until Ctrl+C:
        $ conveyor --mode sync

    Inspect per-domain checkpoints and counters:
        $ conveyor --mode status

    Pause a domain, then replay it from scratch:
        $ conveyor --mode pause --domain shipping_address
        $ conveyor --mode reset --domain shipping_address
        $ conveyor --mode resume --domain shipping_address

    Change a domain's polling interval to 15 minutes:
        $ conveyor --mode set-interval --domain member --interval 15

CONFIGURATION
    Conveyor reads configuration from:
      1. ~/.config/conveyor/config.toml (or $XDG_CONFIG_HOME/conveyor/config.toml)
      2. ./conveyor.toml
      3. Environment variables (CONVEYOR_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    CONVEYOR_LEGACY_URL     Legacy source connection string (required for initial/sync)
    CONVEYOR_TARGET_URL     Target connection string
                            (default: ~/.local/state/conveyor/conveyor.db)
"#)]
struct Cli {
    /// What to do this invocation
    #[arg(short, long, value_enum)]
    mode: Mode,

    /// Domain to operate on (required for pause/resume/reset/set-interval,
    /// optional filter for initial)
    #[arg(short, long)]
    domain: Option<String>,

    /// New sync interval in minutes (set-interval only)
    #[arg(short, long)]
    interval: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Full migration of every registered domain (or one with --domain)
    Initial,
    /// Run the incremental scheduler until Ctrl+C
    Sync,
    /// Show per-domain sync status
    Status,
    /// Pause a domain (requires --domain)
    Pause,
    /// Resume a paused domain (requires --domain)
    Resume,
    /// Clear a domain's checkpoint so the next run replays everything
    Reset,
    /// Change a domain's sync interval (requires --domain and --interval)
    SetInterval,
}

/// Usage mistakes exit 1 after a log line; store failures propagate.
fn finish_control(
    result: Result<(), commands::control::ControlError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_usage() => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("conveyor=info,conveyor_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(Term::stdout().is_term())
        .init();

    let config = config::Config::load();

    let target_url = match config.target_url() {
        Some(url) => url,
        None => {
            tracing::error!("No target database URL configured");
            std::process::exit(1);
        }
    };

    // Ensure the database directory exists for SQLite targets
    if target_url.starts_with("sqlite://") {
        let db_path = target_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Target database path '{}' is relative - behavior depends on current directory. \
                 Consider using an absolute path.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.mode {
        Mode::Initial => {
            commands::initial::handle_initial(&config, &target_url, cli.domain.as_deref())
                .await?;
        }
        Mode::Sync => {
            commands::sync::handle_sync(&config, &target_url).await?;
        }
        Mode::Status => {
            commands::status::handle_status(&target_url).await?;
        }
        Mode::Pause => {
            finish_control(
                commands::control::handle_pause(&target_url, cli.domain.as_deref()).await,
            )?;
        }
        Mode::Resume => {
            finish_control(
                commands::control::handle_resume(&target_url, cli.domain.as_deref()).await,
            )?;
        }
        Mode::Reset => {
            finish_control(
                commands::control::handle_reset(&target_url, cli.domain.as_deref()).await,
            )?;
        }
        Mode::SetInterval => {
            finish_control(
                commands::control::handle_set_interval(
                    &target_url,
                    cli.domain.as_deref(),
                    cli.interval,
                )
                .await,
            )?;
        }
    }

    Ok(())
}
