// ── Data source seam ──
//
// The dashboard talks to the outside world only through `DataSource`.
// `ApiSource` wires it to the two public APIs; tests provide scripted
// implementations.

use std::future::Future;

use bakewatch_api::{DirectoryClient, TransportConfig, TzktClient};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{Cycle, ExtendedStats, Right, Validator};

pub trait DataSource: Send + Sync + 'static {
    fn head_level(&self) -> impl Future<Output = Result<i64, CoreError>> + Send;

    fn upcoming_rights(
        &self,
        baker: &str,
        from_level: i64,
    ) -> impl Future<Output = Result<Vec<Right>, CoreError>> + Send;

    fn past_rights(
        &self,
        baker: &str,
        up_to_level: i64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Right>, CoreError>> + Send;

    fn account_stats(
        &self,
        baker: &str,
    ) -> impl Future<Output = Result<ExtendedStats, CoreError>> + Send;

    fn cycles(&self, limit: u32) -> impl Future<Output = Result<Vec<Cycle>, CoreError>> + Send;

    fn validators(&self) -> impl Future<Output = Result<Vec<Validator>, CoreError>> + Send;
}

/// Production source backed by TzKT and the Baking Bad directory.
#[derive(Debug, Clone)]
pub struct ApiSource {
    tzkt: TzktClient,
    directory: DirectoryClient,
    upcoming_limit: u32,
}

impl ApiSource {
    pub fn new(tzkt: TzktClient, directory: DirectoryClient, upcoming_limit: u32) -> Self {
        Self {
            tzkt,
            directory,
            upcoming_limit,
        }
    }

    /// Build both clients from a shared transport.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, CoreError> {
        let mut transport = TransportConfig::default();
        if let Some(timeout) = config.request_timeout {
            transport = transport.with_timeout(timeout);
        }
        let http = transport.build_client()?;
        Ok(Self::new(
            TzktClient::from_reqwest(&config.chain_url, http.clone())?,
            DirectoryClient::from_reqwest(&config.directory_url, http)?,
            config.upcoming_limit,
        ))
    }
}

impl DataSource for ApiSource {
    async fn head_level(&self) -> Result<i64, CoreError> {
        Ok(self.tzkt.head_level().await?)
    }

    async fn upcoming_rights(&self, baker: &str, from_level: i64) -> Result<Vec<Right>, CoreError> {
        let rights = self
            .tzkt
            .upcoming_rights(baker, from_level, self.upcoming_limit)
            .await?;
        Ok(rights.into_iter().map(Right::from).collect())
    }

    async fn past_rights(
        &self,
        baker: &str,
        up_to_level: i64,
        limit: usize,
    ) -> Result<Vec<Right>, CoreError> {
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        let rights = self.tzkt.past_rights(baker, up_to_level, limit).await?;
        Ok(rights.into_iter().map(Right::from).collect())
    }

    async fn account_stats(&self, baker: &str) -> Result<ExtendedStats, CoreError> {
        Ok(self.tzkt.account(baker).await?.into())
    }

    async fn cycles(&self, limit: u32) -> Result<Vec<Cycle>, CoreError> {
        let cycles = self.tzkt.cycles(limit).await?;
        Ok(cycles.into_iter().map(Cycle::from).collect())
    }

    async fn validators(&self) -> Result<Vec<Validator>, CoreError> {
        let bakers = self.directory.bakers().await?;
        Ok(bakers.into_iter().map(Validator::from).collect())
    }
}
