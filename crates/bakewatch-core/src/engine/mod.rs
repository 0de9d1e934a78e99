// ── Dashboard state engine ──
//
// Pure pieces of the engine: the state struct and its reducer, the derived
// view, and initial-selection resolution. The async runtime that feeds
// events into the reducer lives in `crate::dashboard`.

pub mod selection;
pub mod state;
pub mod view;

pub use selection::{InitialSelection, resolve_initial_selection};
pub use state::{Applied, DashboardState, PollSnapshot, StateEvent};
pub use view::{CycleGroup, RoundFilter, ViewModel};
