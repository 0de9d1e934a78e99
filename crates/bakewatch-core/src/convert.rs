// ── API → domain conversions ──
//
// Wire types from `bakewatch-api` are mapped into the canonical model here,
// so nothing past this module depends on upstream field naming.

use bakewatch_api::directory::models as dir;
use bakewatch_api::tzkt::models as tzkt;

use crate::model::{
    CapacityProfile, Cycle, ExtendedStats, Right, RightKind, RightStatus, Validator,
};

impl From<tzkt::Right> for Right {
    fn from(raw: tzkt::Right) -> Self {
        Self {
            cycle: raw.cycle,
            level: raw.level,
            timestamp: raw.timestamp,
            kind: RightKind::from(raw.kind.as_str()),
            // A negative round is malformed; treat it as absent so the filter drops it.
            round: raw.round.and_then(|r| u32::try_from(r).ok()),
            status: raw.status.as_deref().map(RightStatus::from),
        }
    }
}

impl From<tzkt::Cycle> for Cycle {
    fn from(raw: tzkt::Cycle) -> Self {
        Self {
            index: raw.index,
            first_level: raw.first_level,
            last_level: raw.last_level,
            start_time: raw.start_time,
            end_time: raw.end_time,
            snapshot_level: raw.snapshot_level,
            total_bakers: raw.total_bakers,
            total_baking_power: raw.total_baking_power,
        }
    }
}

impl From<tzkt::Account> for ExtendedStats {
    fn from(raw: tzkt::Account) -> Self {
        Self {
            balance: raw.balance,
            staked_balance: raw.staked_balance,
            unstaked_balance: raw.unstaked_balance,
            external_staked_balance: raw.external_staked_balance,
            external_unstaked_balance: raw.external_unstaked_balance,
            total_staked_balance: raw.total_staked_balance,
            staking_balance: raw.staking_balance,
            delegated_balance: raw.delegated_balance,
            stakers_count: raw.stakers_count,
            limit_of_staking_over_baking: raw.limit_of_staking_over_baking,
            edge_of_baking_over_staking: raw.edge_of_baking_over_staking,
        }
    }
}

impl From<dir::CapacityProfile> for CapacityProfile {
    fn from(raw: dir::CapacityProfile) -> Self {
        Self {
            enabled: raw.enabled,
            min_balance: raw.min_balance,
            fee: raw.fee,
            capacity: raw.capacity,
            free_space: raw.free_space,
            estimated_apy: raw.estimated_apy,
        }
    }
}

impl From<dir::Baker> for Validator {
    fn from(raw: dir::Baker) -> Self {
        Self {
            address: raw.address,
            name: raw.name,
            logo: raw.logo.filter(|l| !l.is_empty()),
            status: raw.status,
            balance: raw.balance,
            delegation: raw.delegation.into(),
            staking: raw.staking.into(),
            placeholder: false,
        }
    }
}
