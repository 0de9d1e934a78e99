// ── Derived view ──
//
// Recomputed from a state snapshot on every render: nothing here is stored.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::state::DashboardState;
use crate::model::{Cycle, Right};

/// Which priority rounds count as opportunities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundFilter {
    /// Round 0 only.
    #[default]
    PrimaryOnly,
    /// Rounds 0 and 1.
    UpToFirstFallback,
}

impl RoundFilter {
    pub fn from_show_round1(show_round1: bool) -> Self {
        if show_round1 {
            Self::UpToFirstFallback
        } else {
            Self::PrimaryOnly
        }
    }

    pub fn shows_round1(self) -> bool {
        self == Self::UpToFirstFallback
    }

    pub fn toggled(self) -> Self {
        Self::from_show_round1(!self.shows_round1())
    }

    pub fn max_round(self) -> u32 {
        match self {
            Self::PrimaryOnly => 0,
            Self::UpToFirstFallback => 1,
        }
    }

    /// Baking rights with a known round within the filter.
    pub fn admits(self, right: &Right) -> bool {
        right.is_baking() && right.round.is_some_and(|r| r <= self.max_round())
    }
}

/// Upcoming rights of one cycle, in the order they were received.
#[derive(Debug, Clone)]
pub struct CycleGroup<'a> {
    pub cycle: i64,
    pub rights: Vec<&'a Right>,
    /// Cycle metadata, when the cycle is among the loaded ones.
    pub info: Option<&'a Cycle>,
}

pub fn filter_rights(rights: &[Right], filter: RoundFilter) -> Vec<&Right> {
    rights.iter().filter(|r| filter.admits(r)).collect()
}

/// Group by cycle, preserving first-encounter order.
pub fn group_by_cycle<'a>(
    rights: &[&'a Right],
    cycles: &'a HashMap<i64, Cycle>,
) -> Vec<CycleGroup<'a>> {
    let mut groups: IndexMap<i64, Vec<&'a Right>> = IndexMap::new();
    for right in rights {
        groups.entry(right.cycle).or_default().push(*right);
    }
    groups
        .into_iter()
        .map(|(cycle, rights)| CycleGroup {
            cycle,
            rights,
            info: cycles.get(&cycle),
        })
        .collect()
}

/// Time until the nearest filtered right; `None` when absent or already due.
pub fn time_to_next(filtered: &[&Right], now: DateTime<Utc>) -> Option<TimeDelta> {
    filtered
        .first()
        .map(|r| r.time_until(now))
        .filter(|d| *d > TimeDelta::zero())
}

/// How far into the future loaded data reaches: the end of the cycle holding
/// the last filtered right if that cycle is known, else the last raw right,
/// else zero.
pub fn coverage_horizon(
    filtered: &[&Right],
    raw: &[Right],
    cycles: &HashMap<i64, Cycle>,
    now: DateTime<Utc>,
) -> TimeDelta {
    if let Some(cycle) = filtered.last().and_then(|r| cycles.get(&r.cycle)) {
        return cycle.end_time - now;
    }
    raw.last()
        .map_or_else(TimeDelta::zero, |r| r.time_until(now))
}

/// Everything the rights view renders, borrowed from one snapshot.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    pub filtered: Vec<&'a Right>,
    pub groups: Vec<CycleGroup<'a>>,
    pub next: Option<&'a Right>,
    pub time_to_next: Option<TimeDelta>,
    pub horizon: TimeDelta,
    /// Whether any rights were loaded before filtering.
    pub has_raw_rights: bool,
}

impl<'a> ViewModel<'a> {
    pub fn derive(state: &'a DashboardState) -> Self {
        let filtered = filter_rights(&state.upcoming, state.round_filter);
        let groups = group_by_cycle(&filtered, &state.cycles);
        let next = filtered.first().copied();
        let time_to_next = time_to_next(&filtered, state.now);
        let horizon = coverage_horizon(&filtered, &state.upcoming, &state.cycles, state.now);
        Self {
            filtered,
            groups,
            next,
            time_to_next,
            horizon,
            has_raw_rights: !state.upcoming.is_empty(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn cycle_count(&self) -> usize {
        self.groups.len()
    }
}
