// ── Core error types ──
//
// User-facing errors from bakewatch-core. Consumers never see raw reqwest
// or serde failures; the `From<bakewatch_api::Error>` impl translates
// transport-layer errors into dashboard-level variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited by upstream API -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Invalid Tezos address: {address}")]
    InvalidAddress { address: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Preference store error: {message}")]
    Preferences { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status behind this error, if it came from an upstream response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bakewatch_api::Error> for CoreError {
    fn from(err: bakewatch_api::Error) -> Self {
        match err {
            bakewatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            bakewatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid API URL: {e}"),
            },
            bakewatch_api::Error::ClientBuild(message) => CoreError::Config { message },
            bakewatch_api::Error::Http {
                status: 404,
                endpoint,
                ..
            } => CoreError::NotFound {
                identifier: endpoint,
            },
            bakewatch_api::Error::Http {
                status,
                endpoint,
                message,
            } => CoreError::Api {
                message: format!("HTTP error! status: {status} ({endpoint}) {message}"),
                status: Some(status),
            },
            bakewatch_api::Error::RateLimited { retry_after_secs } => {
                CoreError::RateLimited { retry_after_secs }
            }
            bakewatch_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("unexpected response: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_preserved() {
        let err: CoreError = bakewatch_api::Error::Http {
            status: 502,
            endpoint: "head".into(),
            message: "Bad Gateway".into(),
        }
        .into();
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("status: 502"));
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let err: CoreError = bakewatch_api::Error::Http {
            status: 404,
            endpoint: "accounts/tz1x".into(),
            message: String::new(),
        }
        .into();
        assert!(matches!(err, CoreError::NotFound { ref identifier } if identifier == "accounts/tz1x"));
    }

    #[test]
    fn rate_limit_maps_through() {
        let err: CoreError = bakewatch_api::Error::RateLimited {
            retry_after_secs: 3,
        }
        .into();
        assert!(matches!(err, CoreError::RateLimited { retry_after_secs: 3 }));
    }
}
