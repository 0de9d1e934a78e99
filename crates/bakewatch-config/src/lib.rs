//! Shared configuration for the bakewatch CLI and TUI.
//!
//! TOML config file + `BAKEWATCH_*` environment overrides, translation to
//! `bakewatch_core::DashboardConfig`, and the file-backed preference store
//! both binaries hand to the dashboard.

pub mod prefs;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bakewatch_core::config::{DEFAULT_BAKER_ADDRESS, MAX_HISTORY_LIMIT};
use bakewatch_core::{DashboardConfig, is_valid_address};

pub use prefs::FilePreferenceStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub dashboard: DashboardSettings,
}

/// Upstream endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Chain indexer base URL (TzKT-compatible).
    #[serde(default = "default_chain_url")]
    pub chain_url: String,

    /// Baker directory base URL (Baking Bad-compatible).
    #[serde(default = "default_directory_url")]
    pub directory_url: String,

    /// Per-request timeout. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            chain_url: default_chain_url(),
            directory_url: default_directory_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardSettings {
    /// Validator shown when no deep link or saved selection applies.
    #[serde(default = "default_baker")]
    pub default_baker: String,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Countdown refresh rate. Zero freezes countdowns between polls.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// Number of past rights kept for the history view.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Number of recent cycles loaded for horizon estimates.
    #[serde(default = "default_cycle_limit")]
    pub cycle_limit: u32,

    /// Page size of the upcoming-rights query.
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_baker: default_baker(),
            poll_interval_secs: default_poll_interval(),
            tick_interval_secs: default_tick_interval(),
            history_limit: default_history_limit(),
            cycle_limit: default_cycle_limit(),
            upcoming_limit: default_upcoming_limit(),
        }
    }
}

fn default_chain_url() -> String {
    DashboardConfig::default().chain_url
}
fn default_directory_url() -> String {
    DashboardConfig::default().directory_url
}
fn default_baker() -> String {
    DEFAULT_BAKER_ADDRESS.into()
}
fn default_poll_interval() -> u64 {
    24
}
fn default_tick_interval() -> u64 {
    1
}
fn default_history_limit() -> usize {
    MAX_HISTORY_LIMIT
}
fn default_cycle_limit() -> u32 {
    20
}
fn default_upcoming_limit() -> u32 {
    DashboardConfig::default().upcoming_limit
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("xyz", "bakewatch", "bakewatch")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the preference store lives.
pub fn preferences_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("preferences.toml"),
        |dirs| dirs.data_dir().join("preferences.toml"),
    )
}

fn dirs_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("bakewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields defaults;
/// `BAKEWATCH_SECTION__KEY` variables override either.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BAKEWATCH_").split("__"));

    let config: Config = figment.extract()?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Validate and build the runtime dashboard configuration.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        for (field, raw) in [
            ("api.chain_url", &self.api.chain_url),
            ("api.directory_url", &self.api.directory_url),
        ] {
            url::Url::parse(raw).map_err(|e| ConfigError::Validation {
                field: field.into(),
                reason: format!("invalid URL '{raw}': {e}"),
            })?;
        }

        let dash = &self.dashboard;
        let default_address = dash.default_baker.trim().to_owned();
        if !is_valid_address(&default_address) {
            return Err(ConfigError::Validation {
                field: "dashboard.default_baker".into(),
                reason: format!("'{default_address}' is not a valid Tezos address"),
            });
        }
        if dash.poll_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "dashboard.poll_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !(1..=MAX_HISTORY_LIMIT).contains(&dash.history_limit) {
            return Err(ConfigError::Validation {
                field: "dashboard.history_limit".into(),
                reason: format!("must be between 1 and {MAX_HISTORY_LIMIT}"),
            });
        }

        Ok(DashboardConfig {
            chain_url: self.api.chain_url.clone(),
            directory_url: self.api.directory_url.clone(),
            request_timeout: self.api.timeout_secs.map(Duration::from_secs),
            default_address,
            poll_interval: Duration::from_secs(dash.poll_interval_secs),
            tick_interval: Duration::from_secs(dash.tick_interval_secs),
            history_limit: dash.history_limit,
            cycle_limit: dash.cycle_limit,
            upcoming_limit: dash.upcoming_limit,
        })
    }
}
