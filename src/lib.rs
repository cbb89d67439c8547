//! Recent-match lookup for League of Legends players.
//!
//! A search resolves an account, lists its recent match IDs, then fetches every
//! match concurrently under a shared permit pool. Account and ranked standing
//! lookups are cached with a fixed TTL.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod riot;
pub mod server;

pub use config::Config;
pub use error::AppError;
