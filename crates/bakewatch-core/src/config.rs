// ── Runtime dashboard configuration ──
//
// Describes where to fetch from and how often. Never touches disk: the
// CLI/TUI builds a `DashboardConfig` (usually via `bakewatch-config`) and
// hands it in.

use std::time::Duration;

/// Validator shown when nothing else resolves.
pub const DEFAULT_BAKER_ADDRESS: &str = "tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx";

/// Upper bound on the past-rights collection.
pub const MAX_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub chain_url: String,
    pub directory_url: String,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub default_address: String,
    /// Zero disables the background poll and tick tasks.
    pub poll_interval: Duration,
    pub tick_interval: Duration,
    pub history_limit: usize,
    pub cycle_limit: u32,
    pub upcoming_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chain_url: bakewatch_api::tzkt::DEFAULT_BASE_URL.to_owned(),
            directory_url: bakewatch_api::directory::DEFAULT_BASE_URL.to_owned(),
            request_timeout: None,
            default_address: DEFAULT_BAKER_ADDRESS.to_owned(),
            poll_interval: Duration::from_secs(24),
            tick_interval: Duration::from_secs(1),
            history_limit: MAX_HISTORY_LIMIT,
            cycle_limit: 20,
            upcoming_limit: bakewatch_api::tzkt::UPCOMING_RIGHTS_LIMIT,
        }
    }
}

impl DashboardConfig {
    /// Variant for single CLI invocations: no background tasks.
    pub fn oneshot(mut self) -> Self {
        self.poll_interval = Duration::ZERO;
        self.tick_interval = Duration::ZERO;
        self
    }

    pub fn runs_background_tasks(&self) -> bool {
        !self.poll_interval.is_zero()
    }
}
