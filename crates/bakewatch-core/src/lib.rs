//! Domain model and reactive state engine between `bakewatch-api` and UI
//! consumers (CLI / TUI).
//!
//! - **[`Dashboard`]**: Central facade owning the dashboard lifecycle:
//!   [`start()`](Dashboard::start) loads the cycle list and validator
//!   directory, resolves the initial selection, then spawns the poll and
//!   tick tasks. [`Dashboard::load_once()`](Dashboard::load_once) performs a
//!   single fetch for one-shot CLI invocations.
//!
//! - **[`DashboardState`]**: One explicit state struct advanced only by the
//!   [`StateEvent`] reducer. Every poll result is tagged with the selection
//!   generation it was issued for, so responses for a previous validator are
//!   discarded instead of applied.
//!
//! - **[`ViewModel`]**: Pure derivation of filtered rights, per-cycle
//!   groups, next-block countdown and coverage horizon from a state snapshot.
//!
//! - **[`DataSource`]**: Seam over the two upstream APIs. [`ApiSource`] is
//!   the production implementation; tests script their own.
//!
//! - **Preferences and navigation** ([`PreferenceStore`], [`Location`]):
//!   injected capabilities instead of ambient globals.

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod format;
pub mod location;
pub mod model;
pub mod prefs;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use engine::{
    Applied, CycleGroup, DashboardState, InitialSelection, PollSnapshot, RoundFilter, StateEvent,
    ViewModel, resolve_initial_selection,
};
pub use error::CoreError;
pub use location::{Location, MemoryLocation};
pub use prefs::{MemoryPreferenceStore, PreferenceStore, Preferences};
pub use source::{ApiSource, DataSource};

pub use model::{
    Address, CapacityProfile, Cycle, ExtendedStats, MUTEZ_PER_TEZ, Right, RightKind, RightStatus,
    Validator, is_valid_address,
};
