// Shared transport configuration and response handling.
//
// Both the chain client and the directory client build their
// `reqwest::Client` here and decode responses through the same helpers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Error;

const DEFAULT_USER_AGENT: &str = concat!("bakewatch/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|e| Error::ClientBuild(e.to_string()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Parse a base URL and guarantee a trailing slash so relative joins
/// append to the path instead of replacing its last segment.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// Decode a JSON body on success, or map the status into an [`Error`].
pub(crate) async fn handle_response<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(endpoint, status, resp).await)
    }
}

async fn parse_error(
    endpoint: &str,
    status: reqwest::StatusCode,
    resp: reqwest::Response,
) -> Error {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        return Error::RateLimited { retry_after_secs };
    }

    let raw = resp.text().await.unwrap_or_default();
    Error::Http {
        status: status.as_u16(),
        endpoint: endpoint.to_owned(),
        message: if raw.is_empty() {
            status.to_string()
        } else {
            raw
        },
    }
}
