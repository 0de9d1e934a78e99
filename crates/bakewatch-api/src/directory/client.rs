// Async HTTP client for the Baking Bad validator directory.

use tracing::debug;
use url::Url;

use super::models::Baker;
use crate::Error;
use crate::transport::{TransportConfig, handle_response, normalize_base_url};

/// Public Baking Bad v3 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.baking-bad.org/v3";

/// Async client for the validator directory.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DirectoryClient {
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Full list of public bakers.
    pub async fn bakers(&self) -> Result<Vec<Baker>, Error> {
        let url = self.base_url.join("bakers")?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response("bakers", resp).await
    }
}
