// Async HTTP client for the TzKT chain API.
//
// Every method maps to a single GET and returns the decoded payload.
// No caching or retries happen here; the dashboard engine owns scheduling.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{Account, Cycle, Head, Right};
use crate::Error;
use crate::transport::{TransportConfig, handle_response, normalize_base_url};

/// Public TzKT mainnet endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tzkt.io/v1";

/// Upper bound on upcoming rights returned in one request.
pub const UPCOMING_RIGHTS_LIMIT: u32 = 10_000;

const RIGHTS_SELECT: &str = "cycle,level,timestamp,type,round,status";

/// Async client for the TzKT REST API.
#[derive(Debug, Clone)]
pub struct TzktClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TzktClient {
    // ── Constructors ─────────────────────────────────────────────────

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

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Current chain head.
    pub async fn head(&self) -> Result<Head, Error> {
        self.get_with_params("head", &[]).await
    }

    /// Current chain level.
    pub async fn head_level(&self) -> Result<i64, Error> {
        Ok(self.head().await?.level)
    }

    /// Baking rights for `baker` at or above `from_level`, in ascending level order.
    pub async fn upcoming_rights(
        &self,
        baker: &str,
        from_level: i64,
        limit: u32,
    ) -> Result<Vec<Right>, Error> {
        let params = [
            ("baker", baker.to_owned()),
            ("level.ge", from_level.to_string()),
            ("limit", limit.to_string()),
            ("type", "baking".to_owned()),
            ("select", RIGHTS_SELECT.to_owned()),
        ];
        self.get_with_params("rights", &params).await
    }

    /// Most recent `limit` baking rights for `baker` at or below `up_to_level`,
    /// newest first.
    pub async fn past_rights(
        &self,
        baker: &str,
        up_to_level: i64,
        limit: u32,
    ) -> Result<Vec<Right>, Error> {
        let params = [
            ("baker", baker.to_owned()),
            ("level.le", up_to_level.to_string()),
            ("limit", limit.to_string()),
            ("type", "baking".to_owned()),
            ("sort.desc", "level".to_owned()),
            ("select", RIGHTS_SELECT.to_owned()),
        ];
        self.get_with_params("rights", &params).await
    }

    /// Extended account stats for `address`.
    pub async fn account(&self, address: &str) -> Result<Account, Error> {
        self.get_with_params(&format!("accounts/{address}"), &[]).await
    }

    /// The `limit` most recent cycles, newest first.
    pub async fn cycles(&self, limit: u32) -> Result<Vec<Cycle>, Error> {
        let params = [
            ("sort.desc", "index".to_owned()),
            ("limit", limit.to_string()),
        ];
        self.get_with_params("cycles", &params).await
    }

    // ── HTTP ─────────────────────────────────────────────────────────

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        handle_response(path, resp).await
    }
}
