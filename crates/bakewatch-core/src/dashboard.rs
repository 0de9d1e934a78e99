// ── Dashboard runtime ──
//
// Owns the state channel and the background tasks for the selected
// validator. Every state change goes through `DashboardState::apply`;
// this module only decides when to fetch and which events to emit.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::engine::{
    Applied, DashboardState, InitialSelection, PollSnapshot, RoundFilter, StateEvent,
    resolve_initial_selection,
};
use crate::error::CoreError;
use crate::location::Location;
use crate::model::{Address, Validator, lookup_or_placeholder};
use crate::prefs::{
    self, KEY_METRICS_EXPANDED, KEY_SELECTED_ADDRESS, KEY_SHOW_ROUND1, PreferenceStore,
    Preferences,
};
use crate::source::DataSource;

// ── Dashboard ────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Publishes whole-state
/// snapshots through a `watch` channel; see [`subscribe()`](Self::subscribe).
pub struct Dashboard<S: DataSource> {
    inner: Arc<DashboardInner<S>>,
}

impl<S: DataSource> Clone for Dashboard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DashboardInner<S> {
    config: DashboardConfig,
    source: S,
    prefs: Arc<dyn PreferenceStore>,
    location: Arc<dyn Location>,
    state: watch::Sender<DashboardState>,
    /// Bumped on every selection; tags all in-flight fetches.
    generation: AtomicU64,
    /// Held across generation bump, state update and task restart.
    selecting: Mutex<()>,
    /// Bumped on every poll; orders overlapping polls of one selection.
    poll_seq: AtomicU64,
    cancel: CancellationToken,
    /// Child token for the current selection's tasks. Cancelled and
    /// replaced on every selection change.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<S: DataSource> Dashboard<S> {
    /// Create a dashboard. Does NOT fetch anything -- call
    /// [`start()`](Self::start) to load and begin polling.
    pub fn new(
        config: DashboardConfig,
        source: S,
        prefs: Arc<dyn PreferenceStore>,
        location: Arc<dyn Location>,
    ) -> Self {
        let saved = Preferences::load(prefs.as_ref());
        let initial = DashboardState::new(Utc::now(), config.history_limit)
            .with_preferences(saved.round_filter(), saved.metrics_expanded);
        let (state, _) = watch::channel(initial);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(DashboardInner {
                config,
                source,
                prefs,
                location,
                state,
                generation: AtomicU64::new(0),
                selecting: Mutex::new(()),
                poll_seq: AtomicU64::new(0),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Direct access to the data source, for reads outside the poll cycle.
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    /// Current navigation fragment (the shareable deep-link address).
    pub fn fragment(&self) -> Option<String> {
        self.inner.location.fragment()
    }

    fn apply(&self, event: StateEvent) -> Applied {
        let mut outcome = Applied::Unchanged;
        self.inner.state.send_if_modified(|state| {
            outcome = state.apply(event);
            outcome == Applied::Changed
        });
        outcome
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = prefs::write(self.inner.prefs.as_ref(), key, value) {
            warn!(key, error = %e, "failed to persist preference");
        }
    }

    fn lookup(&self, address: &str) -> Validator {
        let state = self.inner.state.borrow();
        lookup_or_placeholder(&state.directory, address)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load cycles and the directory, resolve the initial selection, then
    /// start polling it. Load failures are logged and never fatal.
    pub async fn start(&self) {
        let selection = self.initialize().await;
        let _selecting = self.inner.selecting.lock().await;
        if selection.clear_fragment {
            debug!("clearing unresolvable navigation fragment");
            self.inner.location.clear_fragment();
        }
        if selection.from_fragment {
            self.persist(KEY_SELECTED_ADDRESS, selection.validator.address.as_str());
        }
        info!(
            address = %selection.validator.address,
            name = %selection.validator.name,
            "dashboard started"
        );
        self.activate(selection.validator).await;
    }

    async fn initialize(&self) -> InitialSelection {
        let source = &self.inner.source;

        match source.cycles(self.inner.config.cycle_limit).await {
            Ok(cycles) => {
                debug!(count = cycles.len(), "loaded cycles");
                self.apply(StateEvent::CyclesLoaded(cycles));
            }
            Err(e) => warn!(error = %e, "failed to load cycles (non-fatal)"),
        }

        let directory = match source.validators().await {
            Ok(validators) => {
                info!(count = validators.len(), "loaded validator directory");
                self.apply(StateEvent::DirectoryLoaded(validators));
                Some(Arc::clone(&self.inner.state.borrow().directory))
            }
            Err(e) => {
                warn!(error = %e, "failed to load validator directory (non-fatal)");
                None
            }
        };

        let saved = Preferences::load(self.inner.prefs.as_ref());
        let fragment = self.inner.location.fragment();
        resolve_initial_selection(
            fragment.as_deref(),
            saved.selected_address.as_deref(),
            &self.inner.config.default_address,
            directory.as_ref().map(|d| d.as_slice()),
        )
    }

    /// Stop all background tasks. The dashboard cannot be restarted.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard shut down");
    }

    // ── Selection ────────────────────────────────────────────────

    /// Switch to `validator`: persist it, reflect it in the fragment,
    /// clear the previous validator's data and restart polling.
    pub async fn select(&self, validator: Validator) {
        let _selecting = self.inner.selecting.lock().await;
        self.persist(KEY_SELECTED_ADDRESS, validator.address.as_str());
        self.inner.location.set_fragment(&validator.address);
        info!(address = %validator.address, name = %validator.name, "validator selected");
        self.activate(validator).await;
    }

    /// Select by address, using the directory entry when listed.
    pub async fn select_address(&self, raw: &str) -> Result<(), CoreError> {
        let address = Address::parse(raw)?;
        let validator = self.lookup(address.as_str());
        self.select(validator).await;
        Ok(())
    }

    /// Caller holds `selecting`.
    async fn activate(&self, validator: Validator) {
        let generation = self.next_generation();
        self.apply(StateEvent::SelectionChanged {
            validator,
            generation,
        });
        self.restart_tasks(generation).await;
    }

    fn next_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn restart_tasks(&self, generation: u64) {
        let child = {
            let mut guard = self.inner.cancel_child.lock().await;
            guard.cancel();
            *guard = self.inner.cancel.child_token();
            guard.clone()
        };

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            handle.abort();
        }

        if !self.inner.config.runs_background_tasks() {
            return;
        }
        handles.push(tokio::spawn(poll_task(self.clone(), generation, child.clone())));
        if !self.inner.config.tick_interval.is_zero() {
            handles.push(tokio::spawn(tick_task(self.clone(), child)));
        }
        debug!(generation, "background tasks restarted");
    }

    // ── Preferences ──────────────────────────────────────────────

    pub fn set_round_filter(&self, filter: RoundFilter) {
        if self.apply(StateEvent::RoundFilterChanged(filter)) == Applied::Changed {
            self.persist(KEY_SHOW_ROUND1, &filter.shows_round1());
        }
    }

    pub fn toggle_round1(&self) {
        let filter = self.inner.state.borrow().round_filter.toggled();
        self.set_round_filter(filter);
    }

    pub fn set_metrics_expanded(&self, expanded: bool) {
        if self.apply(StateEvent::MetricsPanelToggled(expanded)) == Applied::Changed {
            self.persist(KEY_METRICS_EXPANDED, &expanded);
        }
    }

    pub fn toggle_metrics(&self) {
        let expanded = self.inner.state.borrow().metrics_expanded;
        self.set_metrics_expanded(!expanded);
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Manual retry: poll the current selection now.
    pub async fn refresh(&self) {
        let generation = self.inner.state.borrow().generation;
        self.poll_cycle(generation).await;
    }

    /// Run one poll for `generation`.
    ///
    /// Fetches the head, spawns the history fetch up to it, then fetches
    /// rights and stats. A result that arrives after the selection moved on,
    /// or after a later poll already landed, is discarded.
    pub async fn poll_cycle(&self, generation: u64) {
        let (address, known_level) = {
            let state = self.inner.state.borrow();
            match state.selected_address() {
                Some(address) if state.generation == generation => {
                    (address.to_owned(), state.chain_level)
                }
                _ => return,
            }
        };

        if self.apply(StateEvent::PollStarted { generation }) == Applied::Stale {
            return;
        }
        let seq = self.inner.poll_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let result = match self.inner.source.head_level().await {
            Ok(level) => {
                self.spawn_history(generation, seq, address.clone(), Some(level))
                    .await;
                self.fetch_at(&address, level).await
            }
            Err(e) => {
                // History still gets a chance from the last known level.
                self.spawn_history(generation, seq, address.clone(), known_level)
                    .await;
                Err(e)
            }
        };

        match result {
            Ok(snapshot) => {
                debug!(
                    generation,
                    seq,
                    level = snapshot.level,
                    rights = snapshot.upcoming.len(),
                    "poll succeeded"
                );
                let applied = self.apply(StateEvent::PollSucceeded {
                    generation,
                    seq,
                    snapshot,
                    at: Utc::now(),
                });
                if applied == Applied::Stale {
                    debug!(generation, address, "discarding stale poll result");
                }
            }
            Err(e) => {
                warn!(error = %e, address, "poll failed");
                self.apply(StateEvent::PollFailed {
                    generation,
                    seq,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Head level, then upcoming rights and stats together. All-or-nothing.
    async fn fetch_snapshot(&self, address: &str) -> Result<PollSnapshot, CoreError> {
        let level = self.inner.source.head_level().await?;
        self.fetch_at(address, level).await
    }

    async fn fetch_at(&self, address: &str, level: i64) -> Result<PollSnapshot, CoreError> {
        let source = &self.inner.source;
        let (upcoming, stats) = futures_util::future::try_join(
            source.upcoming_rights(address, level),
            source.account_stats(address),
        )
        .await?;
        Ok(PollSnapshot {
            level,
            upcoming,
            stats,
        })
    }

    async fn spawn_history(
        &self,
        generation: u64,
        seq: u64,
        address: String,
        level: Option<i64>,
    ) {
        let this = self.clone();
        let cancel = self.inner.cancel_child.lock().await.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = this.history_cycle(generation, seq, &address, level) => {}
            }
        });

        let mut handles = self.inner.task_handles.lock().await;
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Fetch past rights up to `level` (or a fresh head when none is
    /// known). Failures are logged and keep prior history.
    async fn history_cycle(&self, generation: u64, seq: u64, address: &str, level: Option<i64>) {
        if self.apply(StateEvent::HistoryStarted { generation }) == Applied::Stale {
            return;
        }
        let source = &self.inner.source;
        let level = match level {
            Some(level) => Ok(level),
            None => source.head_level().await,
        };
        let result = match level {
            Ok(level) => {
                source
                    .past_rights(address, level, self.inner.config.history_limit)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(rights) => {
                debug!(generation, count = rights.len(), "loaded baking history");
                self.apply(StateEvent::HistoryLoaded {
                    generation,
                    seq,
                    rights,
                });
            }
            Err(e) => {
                warn!(error = %e, address, "failed to load baking history");
                self.apply(StateEvent::HistoryFailed { generation, seq });
            }
        }
    }

    // ── One-shot ─────────────────────────────────────────────────

    /// Load everything once without background tasks, for CLI use.
    ///
    /// `address` overrides the usual resolution; it is neither persisted
    /// nor written to the fragment. Returns the resulting snapshot, or the
    /// poll error if head, rights or stats failed.
    pub async fn load_once(&self, address: Option<&str>) -> Result<DashboardState, CoreError> {
        let explicit = address.map(Address::parse).transpose()?;
        let selection = self.initialize().await;
        let validator = match explicit {
            Some(address) => self.lookup(address.as_str()),
            None => selection.validator,
        };
        let address = validator.address.clone();

        let generation = {
            let _selecting = self.inner.selecting.lock().await;
            let generation = self.next_generation();
            self.apply(StateEvent::SelectionChanged {
                validator,
                generation,
            });
            generation
        };
        self.apply(StateEvent::PollStarted { generation });
        let seq = self.inner.poll_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let ((), result) = tokio::join!(
            self.history_cycle(generation, seq, &address, None),
            self.fetch_snapshot(&address)
        );
        match result {
            Ok(snapshot) => {
                self.apply(StateEvent::PollSucceeded {
                    generation,
                    seq,
                    snapshot,
                    at: Utc::now(),
                });
                Ok(self.snapshot())
            }
            Err(e) => {
                self.apply(StateEvent::PollFailed {
                    generation,
                    seq,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Poll immediately, then on every interval tick, until cancelled.
async fn poll_task<S: DataSource>(
    dashboard: Dashboard<S>,
    generation: u64,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(dashboard.inner.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = dashboard.poll_cycle(generation) => {}
                }
            }
        }
    }
    debug!(generation, "poll task stopped");
}

/// Advance the wall clock used for countdowns.
async fn tick_task<S: DataSource>(dashboard: Dashboard<S>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(dashboard.inner.config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                dashboard.apply(StateEvent::Tick(Utc::now()));
            }
        }
    }
}
