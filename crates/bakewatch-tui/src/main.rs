//! `bakewatch-tui`: live terminal dashboard for Tezos baking rights.
//!
//! Two screens (upcoming Rights, recent History) over the state published by
//! [`Dashboard`](bakewatch_core::Dashboard). Logs go to a file because the
//! terminal is owned by the UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bakewatch_config::FilePreferenceStore;
use bakewatch_core::{ApiSource, Dashboard, MemoryLocation};

use crate::app::App;

/// Terminal dashboard for upcoming Tezos baking rights.
#[derive(Parser, Debug)]
#[command(name = "bakewatch-tui", version, about)]
struct Cli {
    /// Validator address to open. Invalid or unknown addresses fall back to
    /// the saved, then the default validator
    baker: Option<String>,

    /// Path to the config file
    #[arg(long, env = "BAKEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log file [default: <temp dir>/bakewatch-tui.log]
    #[arg(long, env = "BAKEWATCH_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("bakewatch-tui.log"))
    }
}

/// `RUST_LOG` wins; otherwise the workspace crates log at the `-v` level.
fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            ["bakewatch_tui", "bakewatch_core", "bakewatch_api", "bakewatch_config"]
                .map(|target| format!("{target}={level}"))
                .join(","),
        )
    })
}

/// Non-blocking file logging. Keep the guard alive until exit so buffered
/// lines reach the file.
fn setup_tracing(path: &Path, verbose: u8) -> Result<WorkerGuard> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let Some(file) = path.file_name() else {
        bail!("log path {} has no file name", path.display());
    };
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Ok(guard)
}

/// Dashboard over the public APIs, seeded with the deep-link address.
fn build_dashboard(cli: &Cli) -> Result<Dashboard<ApiSource>> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(bakewatch_config::config_path);
    let config = bakewatch_config::load_config_from(&path)?.to_dashboard_config()?;

    let source = ApiSource::from_config(&config)?;
    let prefs = Arc::new(FilePreferenceStore::open_default());
    let location = Arc::new(MemoryLocation::new(cli.baker.as_deref()));
    Ok(Dashboard::new(config, source, prefs, location))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli.log_path(), cli.verbose)?;

    let dashboard = build_dashboard(&cli)?;
    info!(
        deep_link = cli.baker.as_deref().unwrap_or("-"),
        chain_url = %dashboard.config().chain_url,
        "starting bakewatch-tui"
    );
    App::new(dashboard).run().await
}
