// Wire types for the Baking Bad directory. Amounts are tez, ratios are 0..1.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baker {
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub delegation: CapacityProfile,
    #[serde(default)]
    pub staking: CapacityProfile,
}

/// Delegation or staking terms advertised by a baker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityProfile {
    pub enabled: bool,
    pub min_balance: f64,
    pub fee: f64,
    pub capacity: f64,
    pub free_space: f64,
    pub estimated_apy: f64,
}
