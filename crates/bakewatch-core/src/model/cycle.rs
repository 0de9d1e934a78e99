use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fixed span of chain levels, used to estimate when rights coverage ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub index: i64,
    pub first_level: i64,
    pub last_level: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub snapshot_level: Option<i64>,
    pub total_bakers: i64,
    pub total_baking_power: i64,
}

impl Cycle {
    pub fn contains_level(&self, level: i64) -> bool {
        (self.first_level..=self.last_level).contains(&level)
    }
}
