//! CLI-specific configuration helpers.
//!
//! Thin layer over `bakewatch_config` that applies `GlobalOpts` overrides.

use std::path::PathBuf;
use std::time::Duration;

use bakewatch_config::Config;
use bakewatch_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file selected by `--config`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(bakewatch_config::config_path)
}

pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(bakewatch_config::load_config_from(&config_path(global))?)
}

/// Build the `DashboardConfig` from file, env and CLI flags.
pub fn dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config(global)?;
    let mut dash = cfg.to_dashboard_config()?;

    if let Some(ref url) = global.chain_url {
        dash.chain_url.clone_from(url);
    }
    if let Some(secs) = global.timeout {
        dash.request_timeout = Some(Duration::from_secs(secs));
    }
    Ok(dash)
}
