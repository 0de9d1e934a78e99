// TzKT chain API (https://api.tzkt.io/v1)

pub mod client;
pub mod models;

pub use client::{DEFAULT_BASE_URL, TzktClient, UPCOMING_RIGHTS_LIMIT};
pub use models::{Account, Cycle, Head, Right};
