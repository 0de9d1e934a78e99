// ── Extended account stats ──
//
// Point-in-time balances for the selected validator, refreshed every poll.
// Amounts are mutez as reported by the chain API.

use serde::{Deserialize, Serialize};

pub const MUTEZ_PER_TEZ: i64 = 1_000_000;

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn mutez_to_tez(mutez: i64) -> f64 {
    mutez as f64 / MUTEZ_PER_TEZ as f64
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedStats {
    pub balance: i64,
    pub staked_balance: i64,
    pub unstaked_balance: i64,
    pub external_staked_balance: i64,
    pub external_unstaked_balance: i64,
    pub total_staked_balance: i64,
    pub staking_balance: i64,
    pub delegated_balance: i64,
    pub stakers_count: i64,
    /// Millionths, as reported by the protocol.
    pub limit_of_staking_over_baking: Option<i64>,
    /// Billionths, as reported by the protocol.
    pub edge_of_baking_over_staking: Option<i64>,
}

impl ExtendedStats {
    pub fn balance_tez(&self) -> f64 {
        mutez_to_tez(self.balance)
    }

    pub fn own_staked_tez(&self) -> f64 {
        mutez_to_tez(self.staked_balance)
    }

    pub fn own_unstaked_tez(&self) -> f64 {
        mutez_to_tez(self.unstaked_balance)
    }

    pub fn external_staked_tez(&self) -> f64 {
        mutez_to_tez(self.external_staked_balance)
    }

    pub fn external_unstaked_tez(&self) -> f64 {
        mutez_to_tez(self.external_unstaked_balance)
    }

    pub fn delegated_tez(&self) -> f64 {
        mutez_to_tez(self.delegated_balance)
    }
}
