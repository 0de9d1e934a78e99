// ── Dashboard state and reducer ──
//
// Every mutation goes through `DashboardState::apply`, one transition per
// event. Poll and history events carry the selection generation they were
// issued for; a mismatch means the user has since switched validators and
// the event is dropped. They also carry a poll sequence number so that of two
// overlapping polls the later-started one always wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::view::RoundFilter;
use crate::model::{Cycle, ExtendedStats, Right, Validator};

/// Result of the joined head → (rights, stats) fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSnapshot {
    pub level: i64,
    pub upcoming: Vec<Right>,
    pub stats: ExtendedStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    DirectoryLoaded(Vec<Validator>),
    CyclesLoaded(Vec<Cycle>),
    SelectionChanged {
        validator: Validator,
        generation: u64,
    },
    PollStarted {
        generation: u64,
    },
    PollSucceeded {
        generation: u64,
        seq: u64,
        snapshot: PollSnapshot,
        at: DateTime<Utc>,
    },
    PollFailed {
        generation: u64,
        seq: u64,
        message: String,
    },
    HistoryStarted {
        generation: u64,
    },
    HistoryLoaded {
        generation: u64,
        seq: u64,
        rights: Vec<Right>,
    },
    HistoryFailed {
        generation: u64,
        seq: u64,
    },
    Tick(DateTime<Utc>),
    RoundFilterChanged(RoundFilter),
    MetricsPanelToggled(bool),
}

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Unchanged,
    /// Event belonged to an earlier selection or an overtaken poll and was
    /// discarded.
    Stale,
}

/// Everything the views need, in one cloneable snapshot. Collections sit
/// behind `Arc` so publishing a snapshot per tick stays cheap.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub directory: Arc<Vec<Validator>>,
    pub cycles: Arc<HashMap<i64, Cycle>>,
    pub selected: Option<Validator>,
    pub generation: u64,
    pub chain_level: Option<i64>,
    pub upcoming: Arc<Vec<Right>>,
    pub past: Arc<Vec<Right>>,
    pub stats: Option<ExtendedStats>,
    pub loading: bool,
    pub history_loading: bool,
    pub error: Option<String>,
    pub now: DateTime<Utc>,
    pub round_filter: RoundFilter,
    pub metrics_expanded: bool,
    pub last_refresh: Option<DateTime<Utc>>,
    pub history_limit: usize,
    /// Sequence numbers of the newest applied poll and history results.
    last_poll_seq: u64,
    last_history_seq: u64,
}

impl DashboardState {
    pub fn new(now: DateTime<Utc>, history_limit: usize) -> Self {
        Self {
            directory: Arc::new(Vec::new()),
            cycles: Arc::new(HashMap::new()),
            selected: None,
            generation: 0,
            chain_level: None,
            upcoming: Arc::new(Vec::new()),
            past: Arc::new(Vec::new()),
            stats: None,
            loading: true,
            history_loading: false,
            error: None,
            now,
            round_filter: RoundFilter::default(),
            metrics_expanded: true,
            last_refresh: None,
            history_limit,
            last_poll_seq: 0,
            last_history_seq: 0,
        }
    }

    pub fn with_preferences(mut self, round_filter: RoundFilter, metrics_expanded: bool) -> Self {
        self.round_filter = round_filter;
        self.metrics_expanded = metrics_expanded;
        self
    }

    /// Whether a refresh is running on top of already-displayed rights.
    pub fn is_refreshing(&self) -> bool {
        self.loading && !self.upcoming.is_empty()
    }

    pub fn selected_address(&self) -> Option<&str> {
        self.selected.as_ref().map(|v| v.address.as_str())
    }

    /// Apply one event.
    pub fn apply(&mut self, event: StateEvent) -> Applied {
        match event {
            StateEvent::DirectoryLoaded(validators) => {
                // Keep the selected entity in sync with a fresher listing.
                if let Some(selected) = self.selected.as_mut() {
                    if let Some(listed) = validators.iter().find(|v| v.address == selected.address)
                    {
                        *selected = listed.clone();
                    }
                }
                self.directory = Arc::new(validators);
                Applied::Changed
            }
            StateEvent::CyclesLoaded(cycles) => {
                self.cycles = Arc::new(cycles.into_iter().map(|c| (c.index, c)).collect());
                Applied::Changed
            }
            StateEvent::SelectionChanged {
                validator,
                generation,
            } => {
                if generation <= self.generation {
                    return Applied::Stale;
                }
                self.selected = Some(validator);
                self.generation = generation;
                self.upcoming = Arc::new(Vec::new());
                self.past = Arc::new(Vec::new());
                self.stats = None;
                self.last_refresh = None;
                self.error = None;
                self.loading = true;
                self.history_loading = true;
                Applied::Changed
            }
            StateEvent::PollStarted { generation } => {
                if generation != self.generation {
                    return Applied::Stale;
                }
                self.loading = true;
                self.error = None;
                Applied::Changed
            }
            StateEvent::PollSucceeded {
                generation,
                seq,
                snapshot,
                at,
            } => {
                if generation != self.generation || seq < self.last_poll_seq {
                    return Applied::Stale;
                }
                self.last_poll_seq = seq;
                self.chain_level = Some(snapshot.level);
                self.upcoming = Arc::new(snapshot.upcoming);
                self.stats = Some(snapshot.stats);
                self.error = None;
                self.last_refresh = Some(at);
                self.loading = false;
                Applied::Changed
            }
            StateEvent::PollFailed {
                generation,
                seq,
                message,
            } => {
                if generation != self.generation || seq < self.last_poll_seq {
                    return Applied::Stale;
                }
                self.last_poll_seq = seq;
                self.error = Some(message);
                self.loading = false;
                Applied::Changed
            }
            StateEvent::HistoryStarted { generation } => {
                if generation != self.generation {
                    return Applied::Stale;
                }
                self.history_loading = true;
                Applied::Changed
            }
            StateEvent::HistoryLoaded {
                generation,
                seq,
                mut rights,
            } => {
                if generation != self.generation || seq < self.last_history_seq {
                    return Applied::Stale;
                }
                self.last_history_seq = seq;
                rights.sort_by(|a, b| b.level.cmp(&a.level));
                rights.truncate(self.history_limit);
                self.past = Arc::new(rights);
                self.history_loading = false;
                Applied::Changed
            }
            StateEvent::HistoryFailed { generation, seq } => {
                if generation != self.generation || seq < self.last_history_seq {
                    return Applied::Stale;
                }
                self.last_history_seq = seq;
                self.history_loading = false;
                Applied::Changed
            }
            StateEvent::Tick(now) => {
                self.now = now;
                Applied::Changed
            }
            StateEvent::RoundFilterChanged(filter) => {
                if filter == self.round_filter {
                    return Applied::Unchanged;
                }
                self.round_filter = filter;
                Applied::Changed
            }
            StateEvent::MetricsPanelToggled(expanded) => {
                if expanded == self.metrics_expanded {
                    return Applied::Unchanged;
                }
                self.metrics_expanded = expanded;
                Applied::Changed
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::model::RightKind;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn right(cycle: i64, level: i64) -> Right {
        Right {
            cycle,
            level,
            timestamp: t0() + TimeDelta::seconds(level),
            kind: RightKind::Baking,
            round: Some(0),
            status: None,
        }
    }

    fn selected(address: &str, generation: u64) -> DashboardState {
        let mut state = DashboardState::new(t0(), 20);
        state.apply(StateEvent::SelectionChanged {
            validator: Validator::placeholder(address),
            generation,
        });
        state
    }

    fn success(generation: u64, seq: u64, level: i64, rights: Vec<Right>) -> StateEvent {
        StateEvent::PollSucceeded {
            generation,
            seq,
            snapshot: PollSnapshot {
                level,
                upcoming: rights,
                stats: ExtendedStats {
                    balance: level,
                    ..ExtendedStats::default()
                },
            },
            at: t0(),
        }
    }

    #[test]
    fn selection_change_clears_rights_and_enters_loading() {
        let mut state = selected("tz1a", 1);
        state.apply(success(1, 1, 100, vec![right(1, 101)]));
        state.apply(StateEvent::HistoryLoaded {
            generation: 1,
            seq: 1,
            rights: vec![right(1, 99)],
        });
        state.apply(StateEvent::PollFailed {
            generation: 1,
            seq: 2,
            message: "boom".into(),
        });

        state.apply(StateEvent::SelectionChanged {
            validator: Validator::placeholder("tz1b"),
            generation: 2,
        });

        assert!(state.upcoming.is_empty());
        assert!(state.past.is_empty());
        assert!(state.stats.is_none());
        assert!(state.last_refresh.is_none());
        assert!(state.error.is_none());
        assert!(state.loading);
        assert!(state.history_loading);
        assert_eq!(state.selected_address(), Some("tz1b"));
        // Chain height is not per-validator.
        assert_eq!(state.chain_level, Some(100));
    }

    #[test]
    fn older_selection_cannot_overtake_newer() {
        let mut state = selected("tz1b", 3);

        let applied = state.apply(StateEvent::SelectionChanged {
            validator: Validator::placeholder("tz1a"),
            generation: 2,
        });

        assert_eq!(applied, Applied::Stale);
        assert_eq!(state.generation, 3);
        assert_eq!(state.selected_address(), Some("tz1b"));
        assert_eq!(
            state.apply(StateEvent::PollStarted { generation: 3 }),
            Applied::Changed
        );
    }

    #[test]
    fn overtaken_poll_result_is_discarded() {
        let mut state = selected("tz1a", 1);
        state.apply(success(1, 5, 200, vec![right(2, 201)]));

        let applied = state.apply(success(1, 4, 100, vec![right(1, 101)]));
        assert_eq!(applied, Applied::Stale);
        assert_eq!(
            state.apply(StateEvent::PollFailed {
                generation: 1,
                seq: 4,
                message: "late".into(),
            }),
            Applied::Stale
        );

        assert_eq!(state.chain_level, Some(200));
        assert_eq!(state.upcoming[0].level, 201);
        assert!(state.error.is_none());
    }

    #[test]
    fn overtaken_history_is_discarded() {
        let mut state = selected("tz1a", 1);
        state.apply(StateEvent::HistoryLoaded {
            generation: 1,
            seq: 2,
            rights: vec![right(1, 50)],
        });

        assert_eq!(
            state.apply(StateEvent::HistoryLoaded {
                generation: 1,
                seq: 1,
                rights: vec![right(1, 40)],
            }),
            Applied::Stale
        );
        assert_eq!(state.past[0].level, 50);
    }

    #[test]
    fn stale_poll_result_is_discarded() {
        let mut state = selected("tz1b", 2);

        let applied = state.apply(success(1, 1, 500, vec![right(5, 501)]));

        assert_eq!(applied, Applied::Stale);
        assert!(state.upcoming.is_empty());
        assert_eq!(state.chain_level, None);
        assert!(state.stats.is_none());
        assert!(state.loading);
    }

    #[test]
    fn stale_failure_and_history_are_discarded() {
        let mut state = selected("tz1b", 2);
        assert_eq!(
            state.apply(StateEvent::PollFailed {
                generation: 1,
                seq: 1,
                message: "old".into()
            }),
            Applied::Stale
        );
        assert_eq!(
            state.apply(StateEvent::HistoryLoaded {
                generation: 1,
                seq: 1,
                rights: vec![right(1, 1)]
            }),
            Applied::Stale
        );
        assert!(state.error.is_none());
        assert!(state.past.is_empty());
    }

    #[test]
    fn success_replaces_data_atomically() {
        let mut state = selected("tz1a", 1);
        state.apply(StateEvent::PollStarted { generation: 1 });
        state.apply(success(1, 1, 100, vec![right(1, 101), right(1, 102)]));

        assert_eq!(state.chain_level, Some(100));
        assert_eq!(state.upcoming.len(), 2);
        assert_eq!(state.stats.as_ref().map(|s| s.balance), Some(100));
        assert!(!state.loading);
        assert_eq!(state.last_refresh, Some(t0()));
    }

    #[test]
    fn failure_keeps_previous_data() {
        let mut state = selected("tz1a", 1);
        state.apply(success(1, 1, 100, vec![right(1, 101)]));

        state.apply(StateEvent::PollStarted { generation: 1 });
        assert!(state.is_refreshing());
        state.apply(StateEvent::PollFailed {
            generation: 1,
            seq: 2,
            message: "HTTP error! status: 502".into(),
        });

        assert_eq!(state.error.as_deref(), Some("HTTP error! status: 502"));
        assert_eq!(state.chain_level, Some(100));
        assert_eq!(state.upcoming.len(), 1);
        assert!(state.stats.is_some());
        assert!(!state.loading);
    }

    #[test]
    fn poll_start_clears_error() {
        let mut state = selected("tz1a", 1);
        state.apply(StateEvent::PollFailed {
            generation: 1,
            seq: 1,
            message: "x".into(),
        });
        state.apply(StateEvent::PollStarted { generation: 1 });
        assert!(state.error.is_none());
        assert!(state.loading);
    }

    #[test]
    fn history_is_sorted_descending_and_bounded() {
        let mut state = selected("tz1a", 1);
        let rights: Vec<Right> = (0..30).map(|i| right(1, 1_000 + i)).collect();
        state.apply(StateEvent::HistoryLoaded {
            generation: 1,
            seq: 1,
            rights,
        });

        assert_eq!(state.past.len(), 20);
        assert_eq!(state.past[0].level, 1_029);
        assert!(state.past.windows(2).all(|w| w[0].level > w[1].level));
        assert!(!state.history_loading);
    }

    #[test]
    fn history_failure_keeps_previous_history() {
        let mut state = selected("tz1a", 1);
        state.apply(StateEvent::HistoryLoaded {
            generation: 1,
            seq: 1,
            rights: vec![right(1, 10)],
        });
        state.apply(StateEvent::HistoryStarted { generation: 1 });
        state.apply(StateEvent::HistoryFailed {
            generation: 1,
            seq: 2,
        });

        assert_eq!(state.past.len(), 1);
        assert!(!state.history_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn cycles_are_indexed() {
        let mut state = DashboardState::new(t0(), 20);
        state.apply(StateEvent::CyclesLoaded(vec![Cycle {
            index: 900,
            first_level: 1,
            last_level: 10,
            start_time: t0(),
            end_time: t0(),
            snapshot_level: None,
            total_bakers: 1,
            total_baking_power: 1,
        }]));
        assert!(state.cycles.contains_key(&900));
    }

    #[test]
    fn directory_refreshes_selected_entity() {
        let mut state = selected("tz1a", 1);
        let mut listed = Validator::placeholder("tz1a");
        listed.placeholder = false;
        listed.name = "Listed".into();
        state.apply(StateEvent::DirectoryLoaded(vec![listed]));
        assert_eq!(state.selected.as_ref().map(|v| v.name.as_str()), Some("Listed"));
    }

    #[test]
    fn preference_events_report_no_op() {
        let mut state = DashboardState::new(t0(), 20);
        assert_eq!(
            state.apply(StateEvent::RoundFilterChanged(RoundFilter::PrimaryOnly)),
            Applied::Unchanged
        );
        assert_eq!(
            state.apply(StateEvent::RoundFilterChanged(RoundFilter::UpToFirstFallback)),
            Applied::Changed
        );
        assert_eq!(state.apply(StateEvent::MetricsPanelToggled(true)), Applied::Unchanged);
        assert_eq!(state.apply(StateEvent::MetricsPanelToggled(false)), Applied::Changed);
        assert!(!state.metrics_expanded);
    }

    #[test]
    fn tick_advances_clock() {
        let mut state = DashboardState::new(t0(), 20);
        let later = t0() + TimeDelta::seconds(1);
        state.apply(StateEvent::Tick(later));
        assert_eq!(state.now, later);
    }
}
