// Baking Bad validator directory (https://api.baking-bad.org/v3)

pub mod client;
pub mod models;

pub use client::{DEFAULT_BASE_URL, DirectoryClient};
pub use models::{Baker, CapacityProfile};
