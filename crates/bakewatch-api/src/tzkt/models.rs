// Wire types for the TzKT chain API.
//
// Field names follow TzKT's camelCase JSON. Every optional field is
// defaulted so partially-selected payloads (`select=...`) still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /head`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Head {
    pub level: i64,
    #[serde(default)]
    pub hash: String,
    pub timestamp: DateTime<Utc>,
}

/// One entry from `GET /rights`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Right {
    #[serde(rename = "type")]
    pub kind: String,
    pub cycle: i64,
    pub level: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub round: Option<i64>,
    /// `realized`, `missed_baking`, `missed_endorsing`, `future`, ...
    #[serde(default)]
    pub status: Option<String>,
}

/// Balance subset of `GET /accounts/{address}`. All amounts are mutez.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub balance: i64,
    pub staked_balance: i64,
    pub unstaked_balance: i64,
    pub external_staked_balance: i64,
    pub external_unstaked_balance: i64,
    pub total_staked_balance: i64,
    pub stakers_count: i64,
    pub limit_of_staking_over_baking: Option<i64>,
    pub edge_of_baking_over_staking: Option<i64>,
    pub staking_balance: i64,
    pub delegated_balance: i64,
}

/// One entry from `GET /cycles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub index: i64,
    pub first_level: i64,
    pub start_time: DateTime<Utc>,
    pub last_level: i64,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub snapshot_level: Option<i64>,
    #[serde(default)]
    pub total_bakers: i64,
    #[serde(default)]
    pub total_baking_power: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn right_without_round_or_status_decodes() {
        let raw = r#"{"type":"baking","cycle":800,"level":7000000,"timestamp":"2025-01-01T00:00:00Z"}"#;
        let right: Right = serde_json::from_str(raw).unwrap();
        assert_eq!(right.kind, "baking");
        assert_eq!(right.round, None);
        assert_eq!(right.status, None);
    }

    #[test]
    fn account_tolerates_missing_fields() {
        let raw = r#"{"type":"delegate","balance":1500000,"stakersCount":3}"#;
        let account: Account = serde_json::from_str(raw).unwrap();
        assert_eq!(account.balance, 1_500_000);
        assert_eq!(account.stakers_count, 3);
        assert_eq!(account.delegated_balance, 0);
        assert_eq!(account.kind.as_deref(), Some("delegate"));
    }
}
