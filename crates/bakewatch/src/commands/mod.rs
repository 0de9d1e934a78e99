//! Command dispatch: bridges CLI args -> dashboard -> output formatting.

pub mod bakers;
pub mod config_cmd;
pub mod cycles;
pub mod history;
pub mod rights;
pub mod stats;
pub mod watch;

use std::sync::Arc;

use bakewatch_config::FilePreferenceStore;
use bakewatch_core::{ApiSource, Dashboard, DashboardConfig, MemoryLocation};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a network-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let config = crate::config::dashboard_config(global)?;

    match cmd {
        Command::Watch(args) => {
            let dashboard = build_dashboard(config, global.baker.as_deref())?;
            watch::handle(&dashboard, &args, global).await
        }
        Command::Rights(args) => rights::handle(&oneshot(config)?, &args, global).await,
        Command::History => history::handle(&oneshot(config)?, global).await,
        Command::Stats => stats::handle(&oneshot(config)?, global).await,
        Command::Bakers(args) => bakers::handle(&oneshot(config)?, &args, global).await,
        Command::Cycles(args) => cycles::handle(&oneshot(config)?, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

fn oneshot(config: DashboardConfig) -> Result<Dashboard<ApiSource>, CliError> {
    build_dashboard(config.oneshot(), None)
}

/// Dashboard over the public APIs, sharing the TUI's saved preferences.
fn build_dashboard(
    config: DashboardConfig,
    fragment: Option<&str>,
) -> Result<Dashboard<ApiSource>, CliError> {
    let source = ApiSource::from_config(&config)?;
    let prefs = Arc::new(FilePreferenceStore::open_default());
    let location = Arc::new(MemoryLocation::new(fragment));
    Ok(Dashboard::new(config, source, prefs, location))
}
