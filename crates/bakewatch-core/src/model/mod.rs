// ── Domain model ──
//
// Canonical types consumed by the state engine and the UIs. API wire
// types are converted into these in `crate::convert`.

pub mod address;
pub mod cycle;
pub mod right;
pub mod stats;
pub mod validator;

pub use address::{Address, is_valid_address};
pub use cycle::Cycle;
pub use right::{Right, RightKind, RightStatus};
pub use stats::{ExtendedStats, MUTEZ_PER_TEZ, mutez_to_tez};
pub use validator::{CapacityProfile, Validator, lookup_or_placeholder};
