//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use bakewatch_config::ConfigError;
use bakewatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const RATE_LIMITED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {url}")]
    #[diagnostic(
        code(bakewatch::connection_failed),
        help(
            "Check your network connection and the configured API URLs.\n\
             Reason: {reason}\n\
             Try: bakewatch config show"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(bakewatch::timeout),
        help("Increase the timeout with --timeout or api.timeout_secs in the config file.")
    )]
    Timeout,

    #[error("Rate limited by the upstream API")]
    #[diagnostic(
        code(bakewatch::rate_limited),
        help("Wait {retry_after_secs}s before retrying.")
    )]
    RateLimited { retry_after_secs: u64 },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("'{identifier}' not found")]
    #[diagnostic(
        code(bakewatch::not_found),
        help("Run: bakewatch bakers --search <name> to find a validator address")
    )]
    NotFound { identifier: String },

    #[error("Invalid Tezos address: {address}")]
    #[diagnostic(
        code(bakewatch::invalid_address),
        help("Validator addresses start with tz1, tz2, tz3 or KT1 followed by 33 base58 characters.")
    )]
    InvalidAddress { address: String },

    #[error("{message}")]
    #[diagnostic(code(bakewatch::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bakewatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists")]
    #[diagnostic(
        code(bakewatch::config_exists),
        help("Use --force to overwrite it.\nPath: {path}")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(bakewatch::config),
        help("Check the config file syntax. Run: bakewatch config path")
    )]
    Config(Box<ConfigError>),

    #[error("Could not save preferences: {message}")]
    #[diagnostic(code(bakewatch::preferences))]
    Preferences { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(bakewatch::internal))]
    Internal { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidAddress { .. } | Self::Validation { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            CoreError::NotFound { identifier } => Self::NotFound { identifier },
            CoreError::InvalidAddress { address } => Self::InvalidAddress { address },
            CoreError::Api { message, .. } => Self::ApiError { message },
            CoreError::Preferences { message } => Self::Preferences { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::ConnectionFailed {
                    url: "https://api.tzkt.io/v1".into(),
                    reason: "dns".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout, exit_code::TIMEOUT),
            (
                CoreError::RateLimited {
                    retry_after_secs: 3,
                },
                exit_code::RATE_LIMITED,
            ),
            (
                CoreError::InvalidAddress {
                    address: "tz1x".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::Api {
                    message: "HTTP error! status: 500".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn config_validation_is_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "dashboard.default_baker".into(),
            reason: "bad".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("dashboard.default_baker"));
    }
}
