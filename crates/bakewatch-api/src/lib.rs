// bakewatch-api: Async Rust clients for the TzKT chain API and the
// Baking Bad validator directory.

pub mod directory;
pub mod error;
pub mod transport;
pub mod tzkt;

pub use directory::DirectoryClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use tzkt::TzktClient;
